//! Asynchronous ingestion pipeline.
//!
//! Upload flow:
//! 1. The upload route saves the raw blob and creates a PROCESSING track
//! 2. An ingestion job is enqueued; the submitter returns immediately
//! 3. The single drain task copies the blob to its processed location,
//!    extracts metadata best-effort, and flips the track to READY or ERROR

mod extractor;
mod models;
mod queue;
mod worker;

pub use extractor::{extract_metadata, AudioMetadata};
pub use models::{IngestionJob, JobStatus};
pub use queue::{JobHandler, JobQueue};
pub use worker::{IngestionError, IngestionWorker};
