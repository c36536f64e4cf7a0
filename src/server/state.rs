use axum::extract::FromRef;

use crate::ingestion::JobQueue;
use crate::storage::BlobStore;
use crate::track_store::TrackStore;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedTrackStore = Arc<dyn TrackStore>;
pub type GuardedBlobStore = Arc<BlobStore>;
pub type GuardedJobQueue = Arc<JobQueue>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub track_store: GuardedTrackStore,
    pub blob_store: GuardedBlobStore,
    pub job_queue: GuardedJobQueue,
    pub hash: String,
}

impl FromRef<ServerState> for GuardedTrackStore {
    fn from_ref(input: &ServerState) -> Self {
        input.track_store.clone()
    }
}

impl FromRef<ServerState> for GuardedBlobStore {
    fn from_ref(input: &ServerState) -> Self {
        input.blob_store.clone()
    }
}

impl FromRef<ServerState> for GuardedJobQueue {
    fn from_ref(input: &ServerState) -> Self {
        input.job_queue.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
