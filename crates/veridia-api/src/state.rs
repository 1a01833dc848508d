//! Application state shared across handlers.

use sqlx::PgPool;
use std::sync::Arc;
use veridia_core::Config;
use veridia_db::UserRepositoryTrait;

use crate::services::ekyc::{EnrollmentService, VerificationService};
use crate::services::users::UserService;

/// Main application state: configuration, pool, and the domain services
/// handlers dispatch into.
pub struct AppState {
    pub config: Config,
    pub pool: PgPool,
    pub users: Arc<dyn UserRepositoryTrait>,
    pub user_service: UserService,
    pub enrollment: EnrollmentService,
    pub verification: VerificationService,
}
