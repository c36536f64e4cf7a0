//! Mixtape Server Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod ingestion;
pub mod server;
pub mod storage;
pub mod track_store;

// Re-export commonly used types for convenience
pub use server::{run_server, RequestsLoggingLevel};
pub use storage::BlobStore;
pub use track_store::{SqliteTrackStore, Track, TrackStatus, TrackStore};
