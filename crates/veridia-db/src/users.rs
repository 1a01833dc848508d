use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;
use veridia_core::models::User;
use veridia_core::AppError;

use crate::traits::UserRepositoryTrait;

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    #[tracing::instrument(skip(self), fields(db.table = "tb_users", db.operation = "select"))]
    async fn get_by_email(&self, email: &str) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, full_name, phone_number,
                   is_ekyc_uploaded, created_at, updated_at
            FROM tb_users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        user.ok_or_else(|| AppError::UserNotFound("user not found".to_string()))
    }

    #[tracing::instrument(
        skip(self, password_hash),
        fields(db.table = "tb_users", db.operation = "insert")
    )]
    async fn create(
        &self,
        email: &str,
        password_hash: &str,
        full_name: Option<&str>,
        phone_number: Option<&str>,
    ) -> Result<User, AppError> {
        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO tb_users (email, password_hash, full_name, phone_number)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, password_hash, full_name, phone_number,
                      is_ekyc_uploaded, created_at, updated_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(full_name)
        .bind(phone_number)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
                Err(AppError::AlreadyExists("user already exists".to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    #[tracing::instrument(
        skip(self),
        fields(db.table = "tb_users", db.operation = "update", db.record_id = %user_id)
    )]
    async fn mark_ekyc_uploaded(&self, user_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE tb_users SET is_ekyc_uploaded = TRUE, updated_at = now() WHERE id = $1",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::UserNotFound("user not found".to_string()));
        }

        Ok(())
    }
}
