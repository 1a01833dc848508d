//! User account service: registration, password login, and lookup.

use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use veridia_core::models::User;
use veridia_core::AppError;
use veridia_db::UserRepositoryTrait;

use crate::auth::encode_token;

/// Successful login payload.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub email: String,
}

pub struct UserService {
    users: Arc<dyn UserRepositoryTrait>,
    jwt_secret: String,
    jwt_expiry_hours: i64,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepositoryTrait>,
        jwt_secret: String,
        jwt_expiry_hours: i64,
    ) -> Self {
        Self {
            users,
            jwt_secret,
            jwt_expiry_hours,
        }
    }

    #[tracing::instrument(skip(self, password), fields(user.email = %email))]
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
        phone_number: Option<&str>,
    ) -> Result<User, AppError> {
        let password = password.to_string();
        // bcrypt is CPU-bound; keep it off the async executor.
        let password_hash = tokio::task::spawn_blocking(move || {
            bcrypt::hash(password, bcrypt::DEFAULT_COST)
        })
        .await
        .map_err(|e| AppError::Internal(format!("password hashing task failed: {e}")))?
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))?;

        let user = self
            .users
            .create(email, &password_hash, full_name, phone_number)
            .await?;

        tracing::info!(user.id = %user.id, "User registered");
        Ok(user)
    }

    #[tracing::instrument(skip(self, password), fields(user.email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AppError> {
        let user = match self.users.get_by_email(email).await {
            Ok(user) => user,
            // Do not reveal whether the account exists.
            Err(AppError::UserNotFound(_)) => {
                return Err(AppError::InvalidCredentials(
                    "invalid email or password".to_string(),
                ))
            }
            Err(e) => return Err(e),
        };

        let password = password.to_string();
        let password_hash = user.password_hash.clone();
        let matches =
            tokio::task::spawn_blocking(move || bcrypt::verify(password, &password_hash))
                .await
                .map_err(|e| AppError::Internal(format!("password verify task failed: {e}")))?
                .map_err(|e| AppError::Internal(format!("password verify failed: {e}")))?;

        if !matches {
            return Err(AppError::InvalidCredentials(
                "invalid email or password".to_string(),
            ));
        }

        let access_token = encode_token(&user.email, &self.jwt_secret, self.jwt_expiry_hours)?;

        Ok(LoginResponse {
            access_token,
            token_type: "bearer".to_string(),
            email: user.email,
        })
    }

    pub async fn get_by_email(&self, email: &str) -> Result<User, AppError> {
        self.users.get_by_email(email).await
    }
}
