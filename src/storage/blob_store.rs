//! Blob storage for uploaded and processed audio files.
//!
//! Two root directories: uploads hold files exactly as they arrived,
//! processed holds the canonical playable copy keyed by track id. Filenames
//! are always generated server-side (UUID + extension), never user input.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::warn;

/// Errors that can occur while reading or writing blobs.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Filesystem-backed store with an upload root and a processed root.
pub struct BlobStore {
    upload_dir: PathBuf,
    processed_dir: PathBuf,
}

impl BlobStore {
    pub fn new(upload_dir: impl Into<PathBuf>, processed_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            processed_dir: processed_dir.into(),
        }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn processed_dir(&self) -> &Path {
        &self.processed_dir
    }

    /// Create both root directories. Must run before any write.
    pub async fn init(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.upload_dir).await?;
        fs::create_dir_all(&self.processed_dir).await?;
        Ok(())
    }

    /// Path for an as-uploaded blob. Pure join, no I/O.
    pub fn upload_path(&self, filename: &str) -> PathBuf {
        self.upload_dir.join(filename)
    }

    /// Path for a canonical processed blob. Pure join, no I/O.
    pub fn processed_path(&self, filename: &str) -> PathBuf {
        self.processed_dir.join(filename)
    }

    /// Write bytes to the given path, creating parent directories as needed.
    ///
    /// There is exactly one writer per path (filenames are fresh UUIDs), so
    /// write-in-place is sufficient; readers never race the writer.
    pub async fn save(&self, data: &[u8], path: &Path) -> Result<(), StorageError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let mut file = fs::File::create(path).await?;
        file.write_all(data).await?;
        file.flush().await?;
        Ok(())
    }

    /// Copy a blob, creating destination parent directories as needed.
    pub async fn copy(&self, src: &Path, dst: &Path) -> Result<(), StorageError> {
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::copy(src, dst).await?;
        Ok(())
    }

    /// Best-effort delete. A missing file is not an error; anything else is
    /// logged and swallowed so cleanup never fails the caller.
    pub async fn delete(&self, path: &Path) {
        if let Err(e) = fs::remove_file(path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to delete blob {}: {}", path.display(), e);
            }
        }
    }
}
