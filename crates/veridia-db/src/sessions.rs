use async_trait::async_trait;
use sqlx::PgPool;
use veridia_core::AppError;

use crate::traits::SessionRepositoryTrait;

/// Push-notification token registry keyed by upload session.
///
/// The orchestrators treat registration as best-effort; errors returned here
/// are logged and swallowed by the caller.
#[derive(Clone)]
pub struct SessionTokenRepository {
    pool: PgPool,
}

impl SessionTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepositoryTrait for SessionTokenRepository {
    #[tracing::instrument(
        skip(self, fcm_token),
        fields(db.table = "tb_session_tokens", db.operation = "upsert")
    )]
    async fn register_push_token(
        &self,
        session_id: &str,
        fcm_token: &str,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO tb_session_tokens (session_id, fcm_token)
            VALUES ($1, $2)
            ON CONFLICT (session_id)
            DO UPDATE SET fcm_token = EXCLUDED.fcm_token, updated_at = NOW()
            "#,
        )
        .bind(session_id)
        .bind(fcm_token)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
