//! Data models for tracks.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a track.
///
/// `Processing` is set at creation; the ingestion worker moves the track to
/// `Ready` or `Error`. Both are terminal: a track stuck in `Error` requires a
/// fresh upload, there is no automatic retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackStatus {
    /// Uploaded, ingestion not finished yet.
    Processing,
    /// Ingested; the processed blob exists and is streamable.
    Ready,
    /// Ingestion failed (non-recoverable).
    Error,
}

impl TrackStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processing => "PROCESSING",
            Self::Ready => "READY",
            Self::Error => "ERROR",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PROCESSING" => Some(Self::Processing),
            "READY" => Some(Self::Ready),
            "ERROR" => Some(Self::Error),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Ready | Self::Error)
    }
}

/// A user's uploaded audio item and its metadata/lifecycle state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    /// UUID, assigned at creation, immutable.
    pub id: String,
    /// Owning user. Auth itself lives outside this server.
    pub owner_id: String,
    /// Never empty for display. Starts as the uploaded filename stem,
    /// replaced by extracted metadata on ingestion.
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
    /// Rounded seconds; 0 until ingestion completes.
    pub duration_secs: i64,
    /// As-uploaded blob. Set at creation, never mutated, never deleted, so a
    /// failed ingestion stays retriable without a re-upload.
    pub original_path: String,
    /// Canonical playable blob; None until ingestion succeeds.
    pub processed_path: Option<String>,
    pub file_size_bytes: i64,
    pub status: TrackStatus,
    /// Unix milliseconds.
    pub created_at: i64,
}

impl Track {
    /// A freshly uploaded track, waiting for ingestion.
    pub fn new(
        id: impl Into<String>,
        owner_id: impl Into<String>,
        title: impl Into<String>,
        original_path: impl Into<String>,
        file_size_bytes: i64,
    ) -> Self {
        Self {
            id: id.into(),
            owner_id: owner_id.into(),
            title: title.into(),
            artist: None,
            album: None,
            genre: None,
            year: None,
            duration_secs: 0,
            original_path: original_path.into(),
            processed_path: None,
            file_size_bytes,
            status: TrackStatus::Processing,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Partial update applied by the ingestion worker. `None` fields are left
/// untouched, so extracted metadata only overwrites what it actually found.
#[derive(Debug, Clone, Default)]
pub struct TrackUpdate {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub duration_secs: Option<i64>,
    pub processed_path: Option<String>,
    pub status: Option<TrackStatus>,
}
