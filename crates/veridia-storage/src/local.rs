use crate::traits::{Storage, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use veridia_core::StorageBackend;

/// Local filesystem storage implementation, intended for development.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "/var/lib/veridia/faces")
    /// * `base_url` - Base URL for serving files (e.g., "http://localhost:4000/files")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    /// Convert storage key to filesystem path with security validation
    ///
    /// Rejects keys containing path traversal sequences that could escape the
    /// base storage directory.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        if storage_key.contains("..") || storage_key.starts_with('/') {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        Ok(self.base_path.join(storage_key))
    }

    /// Generate public URL for file
    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn put_object(
        &self,
        storage_key: &str,
        data: Bytes,
        _content_type: &str,
    ) -> StorageResult<String> {
        let path = self.key_to_path(storage_key)?;
        let size = data.len();

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await?;
        file.write_all(&data).await?;
        file.sync_all().await?;

        let url = self.generate_url(storage_key);

        tracing::info!(
            key = %storage_key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local upload successful"
        );

        Ok(url)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn test_storage() -> (TempDir, LocalStorage) {
        let dir = TempDir::new().expect("create temp dir");
        let storage = LocalStorage::new(dir.path(), "http://localhost:4000/files".to_string())
            .await
            .expect("create storage");
        (dir, storage)
    }

    #[tokio::test]
    async fn test_put_object_writes_file_and_returns_url() {
        let (dir, storage) = test_storage().await;

        let url = storage
            .put_object(
                "uploads/session/left_face_1_aa.jpg",
                Bytes::from_static(b"fake jpeg"),
                "image/jpeg",
            )
            .await
            .expect("upload");

        assert_eq!(
            url,
            "http://localhost:4000/files/uploads/session/left_face_1_aa.jpg"
        );
        let written = std::fs::read(dir.path().join("uploads/session/left_face_1_aa.jpg"))
            .expect("read back");
        assert_eq!(written, b"fake jpeg");
    }

    #[tokio::test]
    async fn test_put_object_rejects_path_traversal() {
        let (_dir, storage) = test_storage().await;

        let err = storage
            .put_object("../escape.jpg", Bytes::from_static(b"x"), "image/jpeg")
            .await
            .expect_err("must reject traversal");

        assert!(matches!(err, StorageError::InvalidKey(_)));
    }

    #[tokio::test]
    async fn test_put_object_rejects_absolute_key() {
        let (_dir, storage) = test_storage().await;

        let err = storage
            .put_object("/etc/passwd", Bytes::from_static(b"x"), "image/jpeg")
            .await
            .expect_err("must reject absolute key");

        assert!(matches!(err, StorageError::InvalidKey(_)));
    }
}
