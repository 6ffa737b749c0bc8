//! Storage abstraction trait
//!
//! This module defines the Storage trait that storage backends implement.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage filename: {0}")]
    InvalidFilename(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A stored upload: its generated filename, absolute path, and public URL path.
///
/// Created once by `Storage::upload`; never mutated or deleted by this system.
#[derive(Debug, Clone)]
pub struct StoredImage {
    pub filename: String,
    pub path: PathBuf,
    pub url: String,
}

/// Storage abstraction trait
///
/// Filenames are flat (no separators); backends reject anything that could
/// resolve outside the storage directory.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write the file bytes verbatim under the given generated filename and
    /// return the stored artifact with its public URL.
    async fn upload(
        &self,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<StoredImage>;

    /// Read back a stored file by its generated filename.
    async fn download(&self, filename: &str) -> StorageResult<Vec<u8>>;

    /// Check whether a stored file exists.
    async fn exists(&self, filename: &str) -> StorageResult<bool>;
}
