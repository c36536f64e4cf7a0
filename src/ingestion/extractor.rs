//! Best-effort metadata extraction from audio containers.
//!
//! Extraction failure is deliberately non-fatal: a corrupt file or an
//! unsupported container yields a zero-valued result instead of an error, so
//! a metadata parser bug can degrade a track's tags but never block its
//! ingestion.

use lofty::prelude::*;
use lofty::probe::Probe;
use std::path::Path;
use tracing::warn;

/// Structured metadata read from an audio file's tags and properties.
///
/// Fields absent in the source tags stay `None`, so callers can distinguish
/// "unknown" from "explicitly empty".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AudioMetadata {
    /// Rounded seconds, 0 when unknown.
    pub duration_secs: i64,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
}

fn non_empty(value: Option<std::borrow::Cow<'_, str>>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Extract metadata from the file at `path`.
///
/// Never fails: any read or parse error is logged and converted into
/// `AudioMetadata::default()` (duration 0, all tag fields absent).
pub fn extract_metadata(path: &Path) -> AudioMetadata {
    let tagged_file = match Probe::open(path).and_then(|probe| probe.read()) {
        Ok(tagged_file) => tagged_file,
        Err(e) => {
            warn!("Metadata extraction failed for {}: {}", path.display(), e);
            return AudioMetadata::default();
        }
    };

    let duration = tagged_file.properties().duration();
    let duration_secs = (duration.as_millis() as f64 / 1000.0).round() as i64;

    let mut metadata = AudioMetadata {
        duration_secs,
        ..Default::default()
    };

    if let Some(tag) = tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) {
        metadata.title = non_empty(tag.title());
        metadata.artist = non_empty(tag.artist());
        metadata.album = non_empty(tag.album());
        metadata.genre = non_empty(tag.genre());
        metadata.year = tag.year().map(|y| y as i32);
    }

    metadata
}
