//! Database schema for track records.

/// SQL schema for the tracks database.
pub const TRACKS_SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS tracks (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL,
    title TEXT NOT NULL,
    artist TEXT,
    album TEXT,
    genre TEXT,
    year INTEGER,
    duration_secs INTEGER NOT NULL DEFAULT 0,

    -- Blob locations
    original_path TEXT NOT NULL,
    processed_path TEXT,
    file_size_bytes INTEGER NOT NULL,

    -- Lifecycle: PROCESSING -> READY | ERROR
    status TEXT NOT NULL,

    -- Unix milliseconds
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_tracks_owner ON tracks(owner_id);
CREATE INDEX IF NOT EXISTS idx_tracks_status ON tracks(status);
"#;

/// Current schema version.
pub const TRACKS_SCHEMA_VERSION: i32 = 1;
