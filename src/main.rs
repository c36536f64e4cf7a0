use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mixtape_server::server::{run_server, RequestsLoggingLevel};
use mixtape_server::storage::BlobStore;
use mixtape_server::track_store::{SqliteTrackStore, TrackStore};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the SQLite tracks database file.
    #[clap(value_parser = parse_path)]
    pub tracks_db: PathBuf,

    /// Directory for raw uploaded blobs. Defaults to "uploads" next to the database.
    #[clap(long, value_parser = parse_path)]
    pub upload_dir: Option<PathBuf>,

    /// Directory for processed, streamable blobs. Defaults to "processed" next to the database.
    #[clap(long, value_parser = parse_path)]
    pub processed_dir: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3001)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,
}

fn data_root(tracks_db: &PathBuf) -> PathBuf {
    tracks_db
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let root = data_root(&cli_args.tracks_db);
    let upload_dir = cli_args.upload_dir.unwrap_or_else(|| root.join("uploads"));
    let processed_dir = cli_args
        .processed_dir
        .unwrap_or_else(|| root.join("processed"));

    info!(
        "Opening SQLite tracks database at {:?}...",
        cli_args.tracks_db
    );
    let track_store: Arc<dyn TrackStore> = Arc::new(SqliteTrackStore::open(&cli_args.tracks_db)?);

    info!(
        "Blob roots: uploads at {:?}, processed at {:?}",
        upload_dir, processed_dir
    );
    let blob_store = Arc::new(BlobStore::new(upload_dir, processed_dir));
    blob_store.init().await?;

    info!("Ready to serve at port {}!", cli_args.port);
    run_server(
        track_store,
        blob_store,
        cli_args.logging_level,
        cli_args.port,
    )
    .await
}
