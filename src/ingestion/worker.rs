//! Ingestion worker - executes one job: copy the blob, extract metadata,
//! flip the track record.

use super::extractor::extract_metadata;
use super::models::IngestionJob;
use super::queue::JobHandler;
use crate::storage::{BlobStore, StorageError};
use crate::track_store::{TrackStatus, TrackStore, TrackUpdate};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

/// Errors that can occur during ingestion.
#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),
}

/// Executes ingestion jobs against the blob store and the track store.
pub struct IngestionWorker {
    track_store: Arc<dyn TrackStore>,
    blob_store: Arc<BlobStore>,
}

impl IngestionWorker {
    pub fn new(track_store: Arc<dyn TrackStore>, blob_store: Arc<BlobStore>) -> Self {
        Self {
            track_store,
            blob_store,
        }
    }

    /// Process a single job.
    ///
    /// The processed copy is written strictly before the record update, so a
    /// READY status is proof the playable blob exists on disk. Metadata
    /// extraction is best-effort and cannot fail the job; copy or record
    /// failures flip the track to ERROR and surface to the queue.
    pub async fn process(&self, job: &IngestionJob) -> Result<(), IngestionError> {
        match self.ingest(job).await {
            Ok(()) => Ok(()),
            Err(e) => {
                error!("Ingestion failed for track {}: {}", job.track_id, e);
                // Best effort: the record may be gone, the job is failed either way.
                let update = TrackUpdate {
                    status: Some(TrackStatus::Error),
                    ..Default::default()
                };
                if let Err(update_err) = self.track_store.update_track(&job.track_id, &update) {
                    error!(
                        "Could not mark track {} as ERROR: {}",
                        job.track_id, update_err
                    );
                }
                Err(e)
            }
        }
    }

    async fn ingest(&self, job: &IngestionJob) -> Result<(), IngestionError> {
        let original = Path::new(&job.original_path);

        // Copy, not move: the upload stays behind as a recovery artifact.
        let extension = original
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("mp3");
        let processed = self
            .blob_store
            .processed_path(&format!("{}.{}", job.track_id, extension));
        self.blob_store.copy(original, &processed).await?;

        let metadata = extract_metadata(original);

        let update = TrackUpdate {
            // Display code relies on a non-empty title.
            title: Some(
                metadata
                    .title
                    .unwrap_or_else(|| "Unknown Title".to_string()),
            ),
            artist: metadata.artist,
            album: metadata.album,
            genre: metadata.genre,
            year: metadata.year,
            duration_secs: Some(metadata.duration_secs),
            processed_path: Some(processed.to_string_lossy().to_string()),
            status: Some(TrackStatus::Ready),
        };
        self.track_store.update_track(&job.track_id, &update)?;

        info!(
            "Ingested track {} -> {} ({}s)",
            job.track_id,
            processed.display(),
            update.duration_secs.unwrap_or(0)
        );

        Ok(())
    }
}

#[async_trait]
impl JobHandler for IngestionWorker {
    async fn handle(&self, job: &IngestionJob) -> anyhow::Result<()> {
        self.process(job).await?;
        Ok(())
    }
}
