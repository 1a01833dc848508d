use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;
use veridia_core::models::FacePose;
use veridia_core::AppError;

use crate::traits::UserFaceRepositoryTrait;

#[derive(Clone)]
pub struct UserFaceRepository {
    pool: PgPool,
}

impl UserFaceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserFaceRepositoryTrait for UserFaceRepository {
    #[tracing::instrument(
        skip(self, left_urls, right_urls, front_urls),
        fields(db.table = "tb_user_faces", db.operation = "replace", db.record_id = %user_id)
    )]
    async fn replace_enrollment_faces(
        &self,
        user_id: Uuid,
        left_urls: &[String],
        right_urls: &[String],
        front_urls: &[String],
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "DELETE FROM tb_user_faces WHERE user_id = $1 AND pose IN ('left', 'right', 'straight')",
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        let groups = [
            (FacePose::Left, left_urls),
            (FacePose::Right, right_urls),
            (FacePose::Straight, front_urls),
        ];
        for (pose, urls) in groups {
            sqlx::query(
                "INSERT INTO tb_user_faces (user_id, pose, source_images) VALUES ($1, $2, $3)",
            )
            .bind(user_id)
            .bind(pose.as_str())
            .bind(urls)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(user_id = %user_id, "Enrollment face records replaced");
        Ok(())
    }

    #[tracing::instrument(
        skip(self, urls),
        fields(db.table = "tb_user_faces", db.operation = "insert", db.record_id = %user_id)
    )]
    async fn append_login_faces(&self, user_id: Uuid, urls: &[String]) -> Result<(), AppError> {
        sqlx::query("INSERT INTO tb_user_faces (user_id, pose, source_images) VALUES ($1, $2, $3)")
            .bind(user_id)
            .bind(FacePose::Login.as_str())
            .bind(urls)
            .execute(&self.pool)
            .await?;

        tracing::info!(user_id = %user_id, "Login face record appended");
        Ok(())
    }
}
