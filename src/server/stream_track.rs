//! Audio streaming with single-range partial content support.
//!
//! A track is streamable only when it is READY and its processed file still
//! exists; existence is re-checked on every request since blobs can disappear
//! out-of-band. Range handling is strict: anything other than a well-formed
//! single `bytes=<start>-[<end>]` range inside the file is answered with 416
//! rather than falling back to the full file.

use super::state::GuardedTrackStore;
use crate::track_store::TrackStatus;
use axum::{
    body::Body,
    extract::{FromRequestParts, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::convert::Infallible;
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncSeekExt, BufReader, SeekFrom},
};
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

const STREAM_BUFFER_SIZE: usize = 4096 * 16;
const CONTENT_TYPE_AUDIO: &str = "audio/mpeg";

/// One `bytes=<start>-[<end>]` range, before validation against a file size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    start_inclusive: u64,
    end_inclusive: Option<u64>,
}

impl ByteRange {
    /// Parse a `Range` header value. `None` means the value is not a
    /// well-formed single range: bad unit, missing start (suffix ranges are
    /// rejected), non-numeric bounds, or a multi-range list.
    fn parse(s: &str) -> Option<ByteRange> {
        let v = s.strip_prefix("bytes=")?;
        if v.contains(',') {
            return None;
        }
        let (start, end) = v.split_once('-')?;
        let start_inclusive = start.parse::<u64>().ok()?;
        let end_inclusive = if end.is_empty() {
            None
        } else {
            Some(end.parse::<u64>().ok()?)
        };
        Some(ByteRange {
            start_inclusive,
            end_inclusive,
        })
    }

    /// Concrete `[start, end]` within a file of `size` bytes, or `None` when
    /// the range falls outside `[0, size-1]` or is inverted.
    fn resolve(&self, size: u64) -> Option<(u64, u64)> {
        let start = self.start_inclusive;
        let end = self.end_inclusive.unwrap_or(size.checked_sub(1)?);
        if start > end || end >= size {
            return None;
        }
        Some((start, end))
    }
}

/// The request's `Range` header, classified but not yet validated.
pub enum RangeHeader {
    Absent,
    Single(ByteRange),
    /// Present but unusable. Resolved to 416 once the file size is known,
    /// so the response can carry `Content-Range: bytes */{size}`.
    Invalid,
}

impl<S: Send + Sync> FromRequestParts<S> for RangeHeader {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        Ok(match parts.headers.get(header::RANGE) {
            None => RangeHeader::Absent,
            Some(value) => match value.to_str().ok().and_then(ByteRange::parse) {
                Some(range) => RangeHeader::Single(range),
                None => RangeHeader::Invalid,
            },
        })
    }
}

fn range_not_satisfiable(size: u64) -> Response {
    Response::builder()
        .status(StatusCode::RANGE_NOT_SATISFIABLE)
        .header(header::ACCEPT_RANGES, "bytes")
        .header(header::CONTENT_RANGE, format!("bytes */{}", size))
        .body(Body::empty())
        .unwrap()
}

pub async fn stream_track(
    range: RangeHeader,
    State(track_store): State<GuardedTrackStore>,
    Path(id): Path<String>,
) -> Response {
    let track = match track_store.get_track(&id) {
        Ok(Some(track)) => track,
        Ok(None) => return StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            warn!("Failed to load track {}: {}", id, e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    if track.status != TrackStatus::Ready {
        debug!("Track {} is not streamable ({})", id, track.status.as_str());
        return StatusCode::NOT_FOUND.into_response();
    }
    let path = match &track.processed_path {
        Some(path) => path.clone(),
        None => return StatusCode::NOT_FOUND.into_response(),
    };

    // The blob can be deleted out-of-band after READY was set, so the READY
    // flag alone is never trusted.
    let mut file = match File::open(&path).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("Processed file for track {} is gone: {}", id, path);
            return StatusCode::NOT_FOUND.into_response();
        }
        Err(e) => {
            warn!("Failed to open {}: {}", path, e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    let size = match file.metadata().await {
        Ok(metadata) => metadata.len(),
        Err(e) => {
            warn!("Failed to stat {}: {}", path, e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let (start, end) = match range {
        RangeHeader::Absent => {
            debug!("Streaming track {} in full ({} bytes)", id, size);
            let reader = BufReader::with_capacity(STREAM_BUFFER_SIZE, file);
            let body = Body::from_stream(ReaderStream::with_capacity(reader, STREAM_BUFFER_SIZE));
            return Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, CONTENT_TYPE_AUDIO)
                .header(header::ACCEPT_RANGES, "bytes")
                .header(header::CONTENT_LENGTH, size)
                .body(body)
                .unwrap();
        }
        RangeHeader::Invalid => return range_not_satisfiable(size),
        RangeHeader::Single(range) => match range.resolve(size) {
            Some(bounds) => bounds,
            None => return range_not_satisfiable(size),
        },
    };

    if file.seek(SeekFrom::Start(start)).await.is_err() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let chunk_length = end - start + 1;

    debug!(
        "Streaming track {} bytes {}-{}/{}",
        id, start, end, size
    );

    let reader = BufReader::with_capacity(STREAM_BUFFER_SIZE, file).take(chunk_length);
    let body = Body::from_stream(ReaderStream::with_capacity(reader, STREAM_BUFFER_SIZE));

    Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header(header::CONTENT_TYPE, CONTENT_TYPE_AUDIO)
        .header(header::ACCEPT_RANGES, "bytes")
        .header(
            header::CONTENT_RANGE,
            format!("bytes {}-{}/{}", start, end, size),
        )
        .header(header::CONTENT_LENGTH, chunk_length)
        .body(body)
        .unwrap()
}
