//! Data models for ingestion jobs.
//!
//! Jobs are purely transient: they live in process memory, are consumed
//! exactly once by the drain loop, and do not survive a restart. The track
//! record is the durable side of the pipeline.

use serde::Serialize;

/// Status of an ingestion job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Queued, not picked up yet.
    Pending,
    /// Currently being executed by the drain loop.
    Processing,
    /// Finished successfully.
    Completed,
    /// Finished with an error; never retried.
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// A queued unit of ingestion work for one track.
#[derive(Debug, Clone, Serialize)]
pub struct IngestionJob {
    pub id: String,
    pub track_id: String,
    pub original_path: String,
    pub status: JobStatus,
    /// Set when the job fails, for observability only.
    pub error_message: Option<String>,
    /// Unix milliseconds.
    pub created_at: i64,
}

impl IngestionJob {
    pub fn new(track_id: impl Into<String>, original_path: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            track_id: track_id.into(),
            original_path: original_path.into(),
            status: JobStatus::Pending,
            error_message: None,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}
