use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use uuid::Uuid;
use veridia_core::models::FacePose;
use veridia_core::AppError;
use veridia_db::{SessionRepositoryTrait, UserFaceRepositoryTrait, UserRepositoryTrait};
use veridia_events::EventPublisher;

use super::uploader::{FaceUploader, PhotoFile};

/// Enrollment flow: upload the three pose groups, replace the user's
/// enrollment face set, flag the account, and publish a sign-up event.
///
/// Push-token registration, the enrollment flag, and event publishing are
/// best effort; uploads and face persistence abort the request on failure.
pub struct EnrollmentService {
    users: Arc<dyn UserRepositoryTrait>,
    faces: Arc<dyn UserFaceRepositoryTrait>,
    sessions: Arc<dyn SessionRepositoryTrait>,
    events: Arc<dyn EventPublisher>,
    uploader: Arc<FaceUploader>,
    max_concurrency: usize,
}

impl EnrollmentService {
    pub fn new(
        users: Arc<dyn UserRepositoryTrait>,
        faces: Arc<dyn UserFaceRepositoryTrait>,
        sessions: Arc<dyn SessionRepositoryTrait>,
        events: Arc<dyn EventPublisher>,
        uploader: Arc<FaceUploader>,
        max_concurrency: usize,
    ) -> Self {
        Self {
            users,
            faces,
            sessions,
            events,
            uploader,
            max_concurrency,
        }
    }

    #[tracing::instrument(skip_all, fields(user.email = %email))]
    pub async fn upload_photos(
        &self,
        email: &str,
        fcm_token: Option<&str>,
        left: Vec<PhotoFile>,
        right: Vec<PhotoFile>,
        front: Vec<PhotoFile>,
    ) -> Result<String, AppError> {
        let started = Instant::now();
        let session_id = Uuid::new_v4().to_string();
        let total_files = left.len() + right.len() + front.len();

        if let Some(token) = fcm_token {
            if let Err(e) = self.sessions.register_push_token(&session_id, token).await {
                tracing::warn!(
                    error = %e,
                    session.id = %session_id,
                    "Failed to register push token, continuing"
                );
            }
        }

        // One semaphore across all three groups bounds the whole request.
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let (left_urls, right_urls, front_urls) = tokio::try_join!(
            self.uploader
                .upload_group(&session_id, FacePose::Left, left, Arc::clone(&semaphore)),
            self.uploader
                .upload_group(&session_id, FacePose::Right, right, Arc::clone(&semaphore)),
            self.uploader
                .upload_group(&session_id, FacePose::Straight, front, Arc::clone(&semaphore)),
        )?;

        // User lookup runs only after every upload has completed.
        let user = self.users.get_by_email(email).await?;

        self.faces
            .replace_enrollment_faces(user.id, &left_urls, &right_urls, &front_urls)
            .await?;

        if let Err(e) = self.users.mark_ekyc_uploaded(user.id).await {
            tracing::warn!(
                error = %e,
                user.id = %user.id,
                "Failed to flag enrollment as uploaded, continuing"
            );
        }

        self.events.publish_signup(user.id, &session_id).await;

        tracing::info!(
            session.id = %session_id,
            user.id = %user.id,
            upload.files = total_files,
            upload.max_concurrency = self.max_concurrency,
            upload.elapsed_secs = started.elapsed().as_secs_f64(),
            "Enrollment photos uploaded"
        );
        Ok(session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{
        test_user, MockFaceRepository, MockPublisher, MockSessionRepository, MockStorage,
        MockUserRepository,
    };
    use super::*;
    use bytes::Bytes;
    use std::time::Duration;
    use veridia_storage::Storage;

    struct Fixture {
        users: Arc<MockUserRepository>,
        faces: Arc<MockFaceRepository>,
        sessions: Arc<MockSessionRepository>,
        events: Arc<MockPublisher>,
        storage: Arc<MockStorage>,
    }

    impl Fixture {
        fn new(users: MockUserRepository, faces: MockFaceRepository) -> Self {
            Self {
                users: Arc::new(users),
                faces: Arc::new(faces),
                sessions: Arc::new(MockSessionRepository::default()),
                events: Arc::new(MockPublisher::default()),
                storage: Arc::new(MockStorage::new()),
            }
        }

        fn service(&self, max_concurrency: usize) -> EnrollmentService {
            let uploader = Arc::new(FaceUploader::new(
                Arc::clone(&self.storage) as Arc<dyn Storage>,
                "uploads",
            ));
            EnrollmentService::new(
                Arc::clone(&self.users) as Arc<dyn UserRepositoryTrait>,
                Arc::clone(&self.faces) as Arc<dyn UserFaceRepositoryTrait>,
                Arc::clone(&self.sessions) as Arc<dyn SessionRepositoryTrait>,
                Arc::clone(&self.events) as Arc<dyn EventPublisher>,
                uploader,
                max_concurrency,
            )
        }
    }

    fn photos(count: usize) -> Vec<PhotoFile> {
        (0..count)
            .map(|i| PhotoFile {
                data: Bytes::from_static(b"fake-image-bytes"),
                filename: Some(format!("photo{i}.jpg")),
                content_type: Some("image/jpeg".to_string()),
            })
            .collect()
    }

    #[tokio::test]
    async fn enrollment_persists_faces_flags_user_and_publishes() {
        let user = test_user("user@example.com");
        let user_id = user.id;
        let fixture = Fixture::new(
            MockUserRepository::with_user(user),
            MockFaceRepository::default(),
        );
        let service = fixture.service(5);

        let session_id = service
            .upload_photos(
                "user@example.com",
                Some("fcm-token-1"),
                photos(3),
                photos(3),
                photos(3),
            )
            .await
            .unwrap();

        let enrollments = fixture.faces.enrollments.lock().unwrap().clone();
        assert_eq!(enrollments.len(), 1);
        let (persisted_user, left, right, front) = &enrollments[0];
        assert_eq!(*persisted_user, user_id);
        assert_eq!(left.len(), 3);
        assert_eq!(right.len(), 3);
        assert_eq!(front.len(), 3);
        assert!(left[0].contains("left_face_1_"));
        assert!(right[1].contains("right_face_2_"));
        assert!(front[0].contains("front_face_1_"));

        assert_eq!(*fixture.users.ekyc_marked.lock().unwrap(), vec![user_id]);

        let tokens = fixture.sessions.tokens.lock().unwrap().clone();
        assert_eq!(tokens, vec![(session_id.clone(), "fcm-token-1".to_string())]);

        let signups = fixture.events.signups.lock().unwrap().clone();
        assert_eq!(signups, vec![(user_id, session_id)]);
    }

    #[tokio::test]
    async fn push_token_failure_does_not_abort_enrollment() {
        let user = test_user("user@example.com");
        let mut fixture = Fixture::new(
            MockUserRepository::with_user(user),
            MockFaceRepository::default(),
        );
        fixture.sessions = Arc::new(MockSessionRepository::failing());
        let service = fixture.service(5);

        let result = service
            .upload_photos(
                "user@example.com",
                Some("fcm-token-1"),
                photos(1),
                photos(1),
                photos(1),
            )
            .await;

        assert!(result.is_ok());
        assert_eq!(fixture.faces.enrollments.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn flag_failure_does_not_abort_enrollment() {
        let user = test_user("user@example.com");
        let user_id = user.id;
        let fixture = Fixture::new(
            MockUserRepository::with_user(user).failing_mark_ekyc(),
            MockFaceRepository::default(),
        );
        let service = fixture.service(5);

        let session_id = service
            .upload_photos("user@example.com", None, photos(1), photos(1), photos(1))
            .await
            .unwrap();

        // Faces persisted and event published despite the flag failure.
        assert_eq!(fixture.faces.enrollments.lock().unwrap().len(), 1);
        let signups = fixture.events.signups.lock().unwrap().clone();
        assert_eq!(signups, vec![(user_id, session_id)]);
    }

    #[tokio::test]
    async fn upload_failure_aborts_before_persistence_and_events() {
        let user = test_user("user@example.com");
        let mut fixture = Fixture::new(
            MockUserRepository::with_user(user),
            MockFaceRepository::default(),
        );
        fixture.storage = Arc::new(MockStorage::new().with_failure_on("right_face_"));
        let service = fixture.service(5);

        let err = service
            .upload_photos("user@example.com", None, photos(1), photos(1), photos(1))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Upload(_)));
        assert!(fixture.faces.enrollments.lock().unwrap().is_empty());
        assert!(fixture.users.ekyc_marked.lock().unwrap().is_empty());
        assert!(fixture.events.signups.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn persistence_failure_aborts_flag_and_events() {
        let user = test_user("user@example.com");
        let fixture = Fixture::new(
            MockUserRepository::with_user(user),
            MockFaceRepository::failing(),
        );
        let service = fixture.service(5);

        let err = service
            .upload_photos("user@example.com", None, photos(1), photos(1), photos(1))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Internal(_)));
        assert!(fixture.users.ekyc_marked.lock().unwrap().is_empty());
        assert!(fixture.events.signups.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_user_fails_after_uploads() {
        let fixture = Fixture::new(MockUserRepository::default(), MockFaceRepository::default());
        let service = fixture.service(5);

        let err = service
            .upload_photos("missing@example.com", None, photos(1), photos(1), photos(1))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::UserNotFound(_)));
        // Uploads happened; the lookup runs only after they complete.
        assert_eq!(fixture.storage.uploaded_keys().len(), 3);
        assert!(fixture.faces.enrollments.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn concurrency_is_bounded_across_all_three_groups() {
        let user = test_user("user@example.com");
        let mut fixture = Fixture::new(
            MockUserRepository::with_user(user),
            MockFaceRepository::default(),
        );
        fixture.storage =
            Arc::new(MockStorage::new().with_uniform_delay(Duration::from_millis(10)));
        let service = fixture.service(3);

        service
            .upload_photos("user@example.com", None, photos(4), photos(4), photos(4))
            .await
            .unwrap();

        assert!(fixture.storage.max_in_flight() <= 3);
        assert_eq!(fixture.storage.uploaded_keys().len(), 12);
    }
}
