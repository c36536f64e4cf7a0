//! Seeded test data
//!
//! Creates the blob roots, the tracks database, and a small set of tracks in
//! known lifecycle states that the e2e tests assert against.

use super::constants::*;
use mixtape_server::storage::BlobStore;
use mixtape_server::track_store::{SqliteTrackStore, Track, TrackStatus, TrackStore, TrackUpdate};
use std::path::Path;
use std::sync::Arc;

/// Deterministic byte pattern so range assertions can check content, not just
/// lengths.
pub fn deterministic_audio_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

/// A minimal valid PCM WAV file: mono, 8 kHz, 16-bit, silent.
///
/// Small enough to upload in tests, real enough for metadata extraction to
/// report its duration.
pub fn wav_bytes(seconds: u32) -> Vec<u8> {
    let sample_rate: u32 = 8000;
    let num_samples = sample_rate * seconds;
    let data_len = num_samples * 2;

    let mut out = Vec::with_capacity(44 + data_len as usize);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes()); // fmt chunk size
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&1u16.to_le_bytes()); // mono
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&(sample_rate * 2).to_le_bytes()); // byte rate
    out.extend_from_slice(&2u16.to_le_bytes()); // block align
    out.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    out.resize(44 + data_len as usize, 0);
    out
}

/// Create the stores under `root` and seed:
/// - TRACK_1_ID: READY, processed blob present (deterministic bytes)
/// - TRACK_GONE_ID: READY, processed path points to a missing file
/// - TRACK_PROCESSING_ID: still PROCESSING
pub async fn create_seeded_stores(
    root: &Path,
) -> anyhow::Result<(Arc<dyn TrackStore>, Arc<BlobStore>)> {
    let blob_store = Arc::new(BlobStore::new(root.join("uploads"), root.join("processed")));
    blob_store.init().await?;

    let track_store: Arc<dyn TrackStore> =
        Arc::new(SqliteTrackStore::open(&root.join("tracks.db"))?);

    // READY track with its blob on disk.
    let original = blob_store.upload_path(&format!("{}.mp3", TRACK_1_ID));
    let audio = deterministic_audio_bytes(TEST_AUDIO_SIZE_BYTES);
    blob_store.save(&audio, &original).await?;
    let processed = blob_store.processed_path(&format!("{}.mp3", TRACK_1_ID));
    blob_store.copy(&original, &processed).await?;

    let track = Track::new(
        TRACK_1_ID,
        TEST_OWNER,
        "Seeded Track",
        original.to_string_lossy().to_string(),
        TEST_AUDIO_SIZE_BYTES as i64,
    );
    track_store.create_track(&track)?;
    track_store.update_track(
        TRACK_1_ID,
        &TrackUpdate {
            status: Some(TrackStatus::Ready),
            processed_path: Some(processed.to_string_lossy().to_string()),
            duration_secs: Some(180),
            ..Default::default()
        },
    )?;

    // READY track whose processed blob never materialized on disk, as if it
    // was deleted out-of-band after ingestion.
    let gone_path = blob_store.processed_path(&format!("{}.mp3", TRACK_GONE_ID));
    let track = Track::new(
        TRACK_GONE_ID,
        TEST_OWNER,
        "Vanished Track",
        "/nonexistent/original.mp3",
        0,
    );
    track_store.create_track(&track)?;
    track_store.update_track(
        TRACK_GONE_ID,
        &TrackUpdate {
            status: Some(TrackStatus::Ready),
            processed_path: Some(gone_path.to_string_lossy().to_string()),
            ..Default::default()
        },
    )?;

    // Track still waiting for ingestion.
    let track = Track::new(
        TRACK_PROCESSING_ID,
        TEST_OWNER,
        "Pending Track",
        "/nonexistent/pending.mp3",
        0,
    );
    track_store.create_track(&track)?;

    Ok((track_store, blob_store))
}
