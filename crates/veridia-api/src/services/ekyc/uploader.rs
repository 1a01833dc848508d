use bytes::Bytes;
use std::sync::Arc;
use tokio::sync::Semaphore;
use uuid::Uuid;
use veridia_core::models::FacePose;
use veridia_core::AppError;
use veridia_storage::Storage;

/// One uploaded photo as received from the multipart request.
#[derive(Debug, Clone)]
pub struct PhotoFile {
    pub data: Bytes,
    pub filename: Option<String>,
    pub content_type: Option<String>,
}

/// Uploads pose groups of face photos with bounded concurrency.
///
/// Object keys follow `<prefix>/<session_id>/<pose>_<index>_<random><ext>`
/// so every upload within a session is collision-free and traceable to its
/// position in the request.
pub struct FaceUploader {
    storage: Arc<dyn Storage>,
    upload_prefix: String,
}

impl FaceUploader {
    pub fn new(storage: Arc<dyn Storage>, upload_prefix: impl Into<String>) -> Self {
        Self {
            storage,
            upload_prefix: upload_prefix.into(),
        }
    }

    /// Upload one pose group. Each photo is uploaded in its own task gated by
    /// the shared semaphore; the returned URLs are in the same order as the
    /// input photos. The first failed upload fails the whole group.
    pub async fn upload_group(
        &self,
        session_id: &str,
        pose: FacePose,
        photos: Vec<PhotoFile>,
        semaphore: Arc<Semaphore>,
    ) -> Result<Vec<String>, AppError> {
        let mut handles = Vec::with_capacity(photos.len());

        for (index, photo) in photos.into_iter().enumerate() {
            // Key indices are 1-based.
            let key = self.object_key(session_id, pose, index + 1, &photo);
            let content_type = photo
                .content_type
                .clone()
                .unwrap_or_else(|| "image/jpeg".to_string());
            let storage = Arc::clone(&self.storage);
            let semaphore = Arc::clone(&semaphore);

            handles.push(tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.map_err(|_| {
                    AppError::Upload("upload semaphore closed".to_string())
                })?;
                tracing::debug!(storage.key = %key, "Uploading face photo");
                storage
                    .put_object(&key, photo.data, &content_type)
                    .await
                    .map_err(|e| AppError::Upload(e.to_string()))
            }));
        }

        // Await in submission order so URLs line up with the input photos.
        let mut urls = Vec::with_capacity(handles.len());
        for handle in handles {
            let url = handle
                .await
                .map_err(|e| AppError::Upload(format!("upload task failed: {e}")))??;
            urls.push(url);
        }
        Ok(urls)
    }

    fn object_key(
        &self,
        session_id: &str,
        pose: FacePose,
        index: usize,
        photo: &PhotoFile,
    ) -> String {
        let ext = resolve_extension(photo.filename.as_deref(), photo.content_type.as_deref());
        format!(
            "{}/{}/{}_{}_{}{}",
            self.upload_prefix,
            session_id,
            pose.key_label(),
            index,
            Uuid::new_v4().simple(),
            ext
        )
    }
}

/// Pick an object-key extension: filename suffix first, then content type,
/// falling back to `.jpg`.
fn resolve_extension(filename: Option<&str>, content_type: Option<&str>) -> String {
    if let Some(name) = filename {
        if let Some(pos) = name.rfind('.') {
            let ext = &name[pos..];
            if ext.len() > 1
                && ext.len() <= 6
                && ext[1..].chars().all(|c| c.is_ascii_alphanumeric())
            {
                return ext.to_ascii_lowercase();
            }
        }
    }

    if let Some(ct) = content_type {
        // Content types may carry parameters, e.g. "image/jpeg; charset=binary".
        let ct = ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase();
        match ct.as_str() {
            "image/jpeg" | "image/jpg" => return ".jpg".to_string(),
            "image/png" => return ".png".to_string(),
            "image/webp" => return ".webp".to_string(),
            "image/heic" => return ".heic".to_string(),
            "image/heif" => return ".heif".to_string(),
            _ => {}
        }
    }

    ".jpg".to_string()
}

#[cfg(test)]
mod tests {
    use super::super::test_support::MockStorage;
    use super::*;
    use std::time::Duration;

    fn photo(name: &str) -> PhotoFile {
        PhotoFile {
            data: Bytes::from_static(b"fake-image-bytes"),
            filename: Some(name.to_string()),
            content_type: Some("image/jpeg".to_string()),
        }
    }

    #[test]
    fn extension_prefers_filename_suffix() {
        assert_eq!(
            resolve_extension(Some("selfie.PNG"), Some("image/jpeg")),
            ".png"
        );
    }

    #[test]
    fn extension_falls_back_to_content_type() {
        assert_eq!(resolve_extension(None, Some("image/webp")), ".webp");
        assert_eq!(
            resolve_extension(Some("no-extension"), Some("image/png; charset=binary")),
            ".png"
        );
    }

    #[test]
    fn extension_defaults_to_jpg() {
        assert_eq!(resolve_extension(None, None), ".jpg");
        assert_eq!(resolve_extension(Some("weird."), Some("application/pdf")), ".jpg");
    }

    #[tokio::test]
    async fn uploads_return_urls_in_input_order() {
        // Later photos finish first; ordering must still match the input.
        let storage = Arc::new(MockStorage::new().with_index_delays(vec![
            Duration::from_millis(30),
            Duration::from_millis(20),
            Duration::from_millis(10),
        ]));
        let uploader = FaceUploader::new(storage, "uploads");
        let semaphore = Arc::new(Semaphore::new(5));

        let urls = uploader
            .upload_group(
                "session-1",
                FacePose::Left,
                vec![photo("a.jpg"), photo("b.jpg"), photo("c.jpg")],
                semaphore,
            )
            .await
            .unwrap();

        assert_eq!(urls.len(), 3);
        for (index, url) in urls.iter().enumerate() {
            assert!(
                url.contains(&format!("left_face_{}_", index + 1)),
                "url {url} out of order at position {index}"
            );
        }
    }

    #[tokio::test]
    async fn concurrency_never_exceeds_semaphore_limit() {
        let storage =
            Arc::new(MockStorage::new().with_uniform_delay(Duration::from_millis(10)));
        let uploader = FaceUploader::new(Arc::clone(&storage) as Arc<dyn Storage>, "uploads");
        let semaphore = Arc::new(Semaphore::new(2));

        let photos: Vec<PhotoFile> = (0..8).map(|i| photo(&format!("p{i}.jpg"))).collect();
        uploader
            .upload_group("session-1", FacePose::Straight, photos, semaphore)
            .await
            .unwrap();

        assert!(storage.max_in_flight() <= 2);
        assert_eq!(storage.uploaded_keys().len(), 8);
    }

    #[tokio::test]
    async fn first_failure_fails_the_group() {
        let storage = Arc::new(MockStorage::new().with_failure_on("_1_"));
        let uploader = FaceUploader::new(storage, "uploads");
        let semaphore = Arc::new(Semaphore::new(5));

        let err = uploader
            .upload_group(
                "session-1",
                FacePose::Right,
                vec![photo("a.jpg"), photo("b.jpg"), photo("c.jpg")],
                semaphore,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Upload(_)));
    }

    #[tokio::test]
    async fn object_keys_carry_prefix_session_and_pose() {
        let storage = Arc::new(MockStorage::new());
        let uploader = FaceUploader::new(Arc::clone(&storage) as Arc<dyn Storage>, "faces");
        let semaphore = Arc::new(Semaphore::new(1));

        uploader
            .upload_group("abc-123", FacePose::Login, vec![photo("x.png")], semaphore)
            .await
            .unwrap();

        let keys = storage.uploaded_keys();
        assert_eq!(keys.len(), 1);
        assert!(keys[0].starts_with("faces/abc-123/login_face_1_"));
        assert!(keys[0].ends_with(".png"));
    }
}
