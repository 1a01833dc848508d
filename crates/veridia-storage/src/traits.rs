//! Storage abstraction trait
//!
//! The uploader only ever writes whole objects to caller-chosen keys, so the
//! trait is a single put operation returning the public URL.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use veridia_core::StorageBackend;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem) must implement this trait so
/// the uploader can work with any backend without coupling to implementation
/// details.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload data to a specific storage key and return the public URL for
    /// the uploaded object.
    async fn put_object(
        &self,
        storage_key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<String>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
