//! In-memory FIFO job queue with a single drain task.
//!
//! Submissions go over an unbounded channel to one spawned task that owns
//! execution, so jobs run strictly one at a time in arrival order and
//! enqueueing never blocks the caller. Job records are kept in a shared map
//! for status observation; they are never persisted.

use super::models::{IngestionJob, JobStatus};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing::{debug, error};

/// Executes a single ingestion job. Implemented by [`super::IngestionWorker`];
/// the seam exists so queue behavior can be tested with a scripted handler.
#[async_trait]
pub trait JobHandler: Send + Sync {
    async fn handle(&self, job: &IngestionJob) -> anyhow::Result<()>;
}

pub struct JobQueue {
    jobs: Arc<Mutex<HashMap<String, IngestionJob>>>,
    tx: mpsc::UnboundedSender<String>,
}

impl JobQueue {
    /// Spawn the drain task and return a handle for submitting jobs.
    pub fn start(handler: Arc<dyn JobHandler>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let jobs = Arc::new(Mutex::new(HashMap::new()));
        tokio::spawn(drain(rx, jobs.clone(), handler));
        Self { jobs, tx }
    }

    /// Register a job and hand it to the drain task. Returns the job id.
    pub fn enqueue(&self, track_id: &str, original_path: &str) -> String {
        let job = IngestionJob::new(track_id, original_path);
        let job_id = job.id.clone();
        self.jobs
            .lock()
            .unwrap()
            .insert(job_id.clone(), job);
        debug!("Enqueued ingestion job {} for track {}", job_id, track_id);
        // The receiver lives in the drain task, which runs for the lifetime
        // of the runtime; a send failure here means shutdown is underway.
        if self.tx.send(job_id.clone()).is_err() {
            error!("Ingestion queue is shut down, job {} will not run", job_id);
        }
        job_id
    }

    /// Snapshot of a job's current state, if it exists.
    pub fn get_job(&self, job_id: &str) -> Option<IngestionJob> {
        self.jobs.lock().unwrap().get(job_id).cloned()
    }
}

async fn drain(
    mut rx: mpsc::UnboundedReceiver<String>,
    jobs: Arc<Mutex<HashMap<String, IngestionJob>>>,
    handler: Arc<dyn JobHandler>,
) {
    while let Some(job_id) = rx.recv().await {
        let job = {
            let mut jobs = jobs.lock().unwrap();
            match jobs.get_mut(&job_id) {
                Some(job) => {
                    job.status = JobStatus::Processing;
                    job.clone()
                }
                None => continue,
            }
        };

        debug!("Processing ingestion job {}", job_id);
        let result = handler.handle(&job).await;

        let mut jobs = jobs.lock().unwrap();
        if let Some(job) = jobs.get_mut(&job_id) {
            match result {
                Ok(()) => job.status = JobStatus::Completed,
                Err(e) => {
                    error!("Ingestion job {} failed: {}", job_id, e);
                    job.status = JobStatus::Failed;
                    job.error_message = Some(e.to_string());
                }
            }
        }
    }
}
