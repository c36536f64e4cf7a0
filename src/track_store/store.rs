//! SQLite store for track records.

use super::models::{Track, TrackStatus, TrackUpdate};
use super::schema::TRACKS_SCHEMA_SQL;
use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Storage operations for track records.
///
/// Only the ingestion worker mutates a track after creation, so no
/// read-path locking beyond the connection mutex is needed.
pub trait TrackStore: Send + Sync {
    /// Insert a new track record.
    fn create_track(&self, track: &Track) -> Result<()>;

    /// Fetch a track by id.
    fn get_track(&self, id: &str) -> Result<Option<Track>>;

    /// Apply a partial update. Fails if the id is unknown.
    fn update_track(&self, id: &str, update: &TrackUpdate) -> Result<()>;
}

/// SQLite implementation of [`TrackStore`].
pub struct SqliteTrackStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteTrackStore {
    /// Open or create a tracks database.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open tracks database: {:?}", path))?;
        conn.execute_batch(TRACKS_SCHEMA_SQL)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// In-memory database, for tests.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(TRACKS_SCHEMA_SQL)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn row_to_track(row: &rusqlite::Row) -> rusqlite::Result<Track> {
        Ok(Track {
            id: row.get("id")?,
            owner_id: row.get("owner_id")?,
            title: row.get("title")?,
            artist: row.get("artist")?,
            album: row.get("album")?,
            genre: row.get("genre")?,
            year: row.get("year")?,
            duration_secs: row.get("duration_secs")?,
            original_path: row.get("original_path")?,
            processed_path: row.get("processed_path")?,
            file_size_bytes: row.get("file_size_bytes")?,
            status: TrackStatus::parse(&row.get::<_, String>("status")?)
                .unwrap_or(TrackStatus::Error),
            created_at: row.get("created_at")?,
        })
    }
}

impl TrackStore for SqliteTrackStore {
    fn create_track(&self, track: &Track) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO tracks (
                id, owner_id, title, artist, album, genre, year, duration_secs,
                original_path, processed_path, file_size_bytes, status, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
            params![
                track.id,
                track.owner_id,
                track.title,
                track.artist,
                track.album,
                track.genre,
                track.year,
                track.duration_secs,
                track.original_path,
                track.processed_path,
                track.file_size_bytes,
                track.status.as_str(),
                track.created_at,
            ],
        )?;
        Ok(())
    }

    fn get_track(&self, id: &str) -> Result<Option<Track>> {
        let conn = self.conn.lock().unwrap();
        let result = conn
            .query_row(
                "SELECT * FROM tracks WHERE id = ?1",
                params![id],
                Self::row_to_track,
            )
            .optional()?;
        Ok(result)
    }

    fn update_track(&self, id: &str, update: &TrackUpdate) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            r#"
            UPDATE tracks SET
                title = COALESCE(?2, title),
                artist = COALESCE(?3, artist),
                album = COALESCE(?4, album),
                genre = COALESCE(?5, genre),
                year = COALESCE(?6, year),
                duration_secs = COALESCE(?7, duration_secs),
                processed_path = COALESCE(?8, processed_path),
                status = COALESCE(?9, status)
            WHERE id = ?1
            "#,
            params![
                id,
                update.title,
                update.artist,
                update.album,
                update.genre,
                update.year,
                update.duration_secs,
                update.processed_path,
                update.status.map(|s| s.as_str()),
            ],
        )?;
        if changed == 0 {
            bail!("Track not found: {}", id);
        }
        Ok(())
    }
}
