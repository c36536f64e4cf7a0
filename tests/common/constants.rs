//! Shared constants for end-to-end tests
//!
//! When seeded test data changes (track ids, blob sizes), update only this
//! file.

// ============================================================================
// Seeded Track IDs
// ============================================================================

/// A READY track whose processed blob exists on disk.
pub const TRACK_1_ID: &str = "track-1";

/// A READY track whose processed blob was deleted out-of-band.
pub const TRACK_GONE_ID: &str = "track-gone";

/// A track still in PROCESSING, not streamable yet.
pub const TRACK_PROCESSING_ID: &str = "track-processing";

/// Owner id used for all seeded tracks.
pub const TEST_OWNER: &str = "test-owner";

// ============================================================================
// Seeded Blob Sizes
// ============================================================================

/// Size of the deterministic audio blob behind TRACK_1_ID.
pub const TEST_AUDIO_SIZE_BYTES: usize = 4096;

// ============================================================================
// Timeouts
// ============================================================================

/// How long to wait for a spawned server to answer on "/".
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// How long to wait for an uploaded track to leave PROCESSING.
pub const INGESTION_TIMEOUT_MS: u64 = 10_000;

/// Per-request client timeout.
pub const REQUEST_TIMEOUT_SECS: u64 = 10;
