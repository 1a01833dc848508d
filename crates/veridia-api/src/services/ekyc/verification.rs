use std::sync::Arc;
use tokio::sync::Semaphore;
use uuid::Uuid;
use veridia_core::models::FacePose;
use veridia_core::AppError;
use veridia_db::{SessionRepositoryTrait, UserFaceRepositoryTrait, UserRepositoryTrait};
use veridia_events::EventPublisher;

use super::uploader::{FaceUploader, PhotoFile};

/// Number of login face photos a verification request must carry.
const LOGIN_PHOTO_COUNT: usize = 3;

/// Face login flow: upload exactly three login photos, append them to the
/// user's login history, and publish a sign-in event.
pub struct VerificationService {
    users: Arc<dyn UserRepositoryTrait>,
    faces: Arc<dyn UserFaceRepositoryTrait>,
    sessions: Arc<dyn SessionRepositoryTrait>,
    events: Arc<dyn EventPublisher>,
    uploader: Arc<FaceUploader>,
    max_concurrency: usize,
}

impl VerificationService {
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
    pub async fn login(
        &self,
        email: &str,
        fcm_token: Option<&str>,
        photos: Vec<PhotoFile>,
    ) -> Result<String, AppError> {
        if photos.len() != LOGIN_PHOTO_COUNT {
            return Err(AppError::Validation(
                "Exactly 3 face photos are required for login".to_string(),
            ));
        }

        let session_id = Uuid::new_v4().to_string();

        if let Some(token) = fcm_token {
            if let Err(e) = self.sessions.register_push_token(&session_id, token).await {
                tracing::warn!(
                    error = %e,
                    session.id = %session_id,
                    "Failed to register push token, continuing"
                );
            }
        }

        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let urls = self
            .uploader
            .upload_group(&session_id, FacePose::Login, photos, semaphore)
            .await?;

        let user = self.users.get_by_email(email).await?;

        self.faces.append_login_faces(user.id, &urls).await?;

        self.events.publish_signin(user.id, &session_id).await;

        tracing::info!(
            session.id = %session_id,
            user.id = %user.id,
            "Login photos uploaded"
        );
        Ok(session_id)
    }
}
