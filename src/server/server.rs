use anyhow::Result;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use crate::ingestion::{IngestionWorker, JobQueue};
use crate::storage::BlobStore;
use crate::track_store::TrackStore;

use axum::{
    extract::State,
    middleware,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use super::upload_routes::make_track_routes;
use super::{log_requests, state::*, RequestsLoggingLevel, ServerConfig};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub hash: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        hash: state.hash.clone(),
    };
    Json(stats)
}

impl ServerState {
    fn new(
        config: ServerConfig,
        track_store: Arc<dyn TrackStore>,
        blob_store: Arc<BlobStore>,
        job_queue: Arc<JobQueue>,
    ) -> ServerState {
        ServerState {
            config,
            start_time: Instant::now(),
            track_store,
            blob_store,
            job_queue,
            hash: env!("GIT_HASH").to_owned(),
        }
    }
}

/// Build the router and wire up the ingestion pipeline behind it.
///
/// Must be called from within a tokio runtime: the job queue spawns its
/// drain task here.
pub fn make_app(
    config: ServerConfig,
    track_store: Arc<dyn TrackStore>,
    blob_store: Arc<BlobStore>,
) -> Result<Router> {
    let worker = Arc::new(IngestionWorker::new(track_store.clone(), blob_store.clone()));
    let job_queue = Arc::new(JobQueue::start(worker));
    let state = ServerState::new(config, track_store, blob_store, job_queue);

    let home_router: Router = Router::new()
        .route("/", get(home))
        .with_state(state.clone());

    let app = home_router
        .nest("/v1/tracks", make_track_routes(state.clone()))
        .layer(middleware::from_fn_with_state(state, log_requests));

    Ok(app)
}

pub async fn run_server(
    track_store: Arc<dyn TrackStore>,
    blob_store: Arc<BlobStore>,
    requests_logging_level: RequestsLoggingLevel,
    port: u16,
) -> Result<()> {
    let config = ServerConfig {
        port,
        requests_logging_level,
        ..ServerConfig::default()
    };
    let app = make_app(config, track_store, blob_store)?;

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;

    Ok(axum::serve(listener, app).await?)
}
