//! Filesystem storage for audio blobs.

mod blob_store;

pub use blob_store::{BlobStore, StorageError};
