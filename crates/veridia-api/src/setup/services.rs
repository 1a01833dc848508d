//! Repository, service, and state wiring

use anyhow::Result;
use sqlx::PgPool;
use std::sync::Arc;
use veridia_core::Config;
use veridia_db::{
    SessionRepositoryTrait, SessionTokenRepository, UserFaceRepository, UserFaceRepositoryTrait,
    UserRepository, UserRepositoryTrait,
};
use veridia_events::{EventPublisher, SqsEventPublisher};
use veridia_storage::Storage;

use crate::services::ekyc::{EnrollmentService, FaceUploader, VerificationService};
use crate::services::users::UserService;
use crate::state::AppState;

/// Build repositories, services, and the shared application state.
pub fn initialize_services(
    config: &Config,
    pool: PgPool,
    storage: Arc<dyn Storage>,
) -> Result<Arc<AppState>> {
    let users: Arc<dyn UserRepositoryTrait> = Arc::new(UserRepository::new(pool.clone()));
    let faces: Arc<dyn UserFaceRepositoryTrait> = Arc::new(UserFaceRepository::new(pool.clone()));
    let sessions: Arc<dyn SessionRepositoryTrait> =
        Arc::new(SessionTokenRepository::new(pool.clone()));

    let events: Arc<dyn EventPublisher> = Arc::new(SqsEventPublisher::new(
        config.sqs_signup_queue_url().map(String::from),
        config.sqs_signin_queue_url().map(String::from),
    ));
    if config.sqs_signup_queue_url().is_none() || config.sqs_signin_queue_url().is_none() {
        tracing::warn!("One or more SQS queue URLs not configured, those events will be skipped");
    }

    let uploader = Arc::new(FaceUploader::new(
        Arc::clone(&storage),
        config.upload_prefix(),
    ));

    let user_service = UserService::new(
        Arc::clone(&users),
        config.jwt_secret().to_string(),
        config.jwt_expiry_hours(),
    );

    let enrollment = EnrollmentService::new(
        Arc::clone(&users),
        Arc::clone(&faces),
        Arc::clone(&sessions),
        Arc::clone(&events),
        Arc::clone(&uploader),
        config.upload_max_concurrency(),
    );

    let verification = VerificationService::new(
        Arc::clone(&users),
        Arc::clone(&faces),
        Arc::clone(&sessions),
        Arc::clone(&events),
        uploader,
        config.upload_max_concurrency(),
    );

    tracing::info!(
        upload_max_concurrency = config.upload_max_concurrency(),
        upload_prefix = %config.upload_prefix(),
        "Services initialized"
    );

    Ok(Arc::new(AppState {
        config: config.clone(),
        pool,
        users,
        user_service,
        enrollment,
        verification,
    }))
}
