//! Repository trait seams
//!
//! The orchestrators depend on these traits rather than concrete sqlx types so
//! they can be exercised with in-memory fakes in tests.

use async_trait::async_trait;
use uuid::Uuid;
use veridia_core::models::User;
use veridia_core::AppError;

#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    /// Look up a user by email. Returns `AppError::UserNotFound` if absent.
    async fn get_by_email(&self, email: &str) -> Result<User, AppError>;

    /// Insert a new user. Returns `AppError::AlreadyExists` on a
    /// unique-constraint violation of the email column.
    async fn create(
        &self,
        email: &str,
        password_hash: &str,
        full_name: Option<&str>,
        phone_number: Option<&str>,
    ) -> Result<User, AppError>;

    /// Set the user's `is_ekyc_uploaded` flag to true.
    async fn mark_ekyc_uploaded(&self, user_id: Uuid) -> Result<(), AppError>;
}

#[async_trait]
pub trait UserFaceRepositoryTrait: Send + Sync {
    /// Atomically replace the user's enrollment faces: deletes all prior
    /// `left`/`right`/`straight` records and inserts the new three pose
    /// groups in a single transaction.
    async fn replace_enrollment_faces(
        &self,
        user_id: Uuid,
        left_urls: &[String],
        right_urls: &[String],
        front_urls: &[String],
    ) -> Result<(), AppError>;

    /// Append a new `login` face record. Prior login records are kept as
    /// history.
    async fn append_login_faces(&self, user_id: Uuid, urls: &[String]) -> Result<(), AppError>;
}

#[async_trait]
pub trait SessionRepositoryTrait: Send + Sync {
    /// Bind a push-notification token to an upload session (upsert).
    async fn register_push_token(&self, session_id: &str, fcm_token: &str)
        -> Result<(), AppError>;
}
