//! Track HTTP routes.
//!
//! Provides endpoints for:
//! - Uploading audio files (multipart/form-data)
//! - Polling a track record while ingestion runs
//! - Streaming a processed track

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::state::{GuardedTrackStore, ServerState};
use super::stream_track::stream_track;
use crate::track_store::{Track, TrackStatus};

/// Extensions accepted without content sniffing. Metadata extraction is
/// best-effort anyway, so a file that merely claims to be audio still gets
/// ingested and degrades gracefully.
const SUPPORTED_EXTENSIONS: &[&str] = &["mp3", "wav", "flac", "ogg", "m4a", "aac"];

#[derive(Debug, Serialize)]
struct UploadedTrack {
    id: String,
    title: String,
    status: TrackStatus,
}

#[derive(Debug, Serialize)]
struct UploadResponse {
    track: UploadedTrack,
    job_id: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn bad_request(message: &str) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

fn file_extension(filename: &str) -> Option<String> {
    std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

fn title_from_filename(filename: &str) -> String {
    std::path::Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(filename)
        .to_string()
}

/// A file is accepted when its extension is a known audio extension or its
/// content sniffs as `audio/*`.
fn is_acceptable_audio(filename: &str, data: &[u8]) -> bool {
    if let Some(ext) = file_extension(filename) {
        if SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
            return true;
        }
    }
    infer::get(data)
        .map(|kind| kind.mime_type().starts_with("audio/"))
        .unwrap_or(false)
}

/// POST / - Upload an audio file (multipart/form-data).
///
/// Saves the raw blob under a generated name, creates the track record in
/// PROCESSING, enqueues the ingestion job, returns immediately.
async fn upload_track(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut filename: Option<String> = None;
    let mut data: Option<Vec<u8>> = None;
    let mut owner: Option<String> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                filename = field.file_name().map(|s| s.to_string());
                match field.bytes().await {
                    Ok(bytes) => data = Some(bytes.to_vec()),
                    Err(e) => {
                        warn!("Failed to read uploaded file data: {}", e);
                        return bad_request("Failed to read file");
                    }
                }
            }
            "owner" => {
                if let Ok(bytes) = field.bytes().await {
                    let value = String::from_utf8_lossy(&bytes).to_string();
                    if !value.is_empty() {
                        owner = Some(value);
                    }
                }
            }
            _ => {}
        }
    }

    let filename = match filename {
        Some(f) if !f.is_empty() => f,
        _ => return bad_request("No filename provided"),
    };
    let data = match data {
        Some(d) if !d.is_empty() => d,
        _ => return bad_request("No file data provided"),
    };
    if !is_acceptable_audio(&filename, &data) {
        return bad_request("File is not audio");
    }
    let owner = owner.unwrap_or_else(|| "local".to_string());

    debug!(
        "User {} uploading file: {} ({} bytes)",
        owner,
        filename,
        data.len()
    );

    // The stored name is always server-generated; user-supplied filenames
    // never touch the filesystem.
    let track_id = uuid::Uuid::new_v4().to_string();
    let extension = file_extension(&filename).unwrap_or_else(|| "mp3".to_string());
    let upload_path = state
        .blob_store
        .upload_path(&format!("{}.{}", track_id, extension));

    if let Err(e) = state.blob_store.save(&data, &upload_path).await {
        warn!("Failed to save upload for {}: {}", filename, e);
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    let original_path = upload_path.to_string_lossy().to_string();
    let track = Track::new(
        &track_id,
        owner,
        title_from_filename(&filename),
        &original_path,
        data.len() as i64,
    );
    if let Err(e) = state.track_store.create_track(&track) {
        warn!("Failed to create track record for {}: {}", filename, e);
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    let job_id = state.job_queue.enqueue(&track_id, &original_path);
    info!(
        "Accepted upload {} as track {} (job {})",
        filename, track_id, job_id
    );

    (
        StatusCode::CREATED,
        Json(UploadResponse {
            track: UploadedTrack {
                id: track.id,
                title: track.title,
                status: track.status,
            },
            job_id,
        }),
    )
        .into_response()
}

/// GET /{id} - Fetch a track record, e.g. to poll ingestion progress.
async fn get_track(
    State(track_store): State<GuardedTrackStore>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match track_store.get_track(&id) {
        Ok(Some(track)) => Json(track).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            warn!("Failed to load track {}: {}", id, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub fn make_track_routes(state: ServerState) -> Router {
    let max_upload = state.config.max_upload_size_bytes;
    Router::new()
        .route("/", post(upload_track))
        .route("/{id}", get(get_track))
        .route("/{id}/stream", get(stream_track))
        .layer(DefaultBodyLimit::max(max_upload))
        .with_state(state)
}
