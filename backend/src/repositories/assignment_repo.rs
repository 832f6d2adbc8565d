use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;

#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    async fn company_ids_for_user(&self, user_id: Uuid) -> Result<Vec<i64>, ApiError>;
    /// Batch insert of one row per company id. Returns the number of rows.
    async fn insert_many(&self, user_id: Uuid, company_ids: &[i64]) -> Result<u64, ApiError>;
    async fn insert(&self, user_id: Uuid, company_id: i64) -> Result<(), ApiError>;
    /// Returns the number of deleted rows.
    async fn delete_for_user(&self, user_id: Uuid) -> Result<u64, ApiError>;
}

pub struct SqlxAssignmentRepository {
    pool: PgPool,
}

impl SqlxAssignmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssignmentRepository for SqlxAssignmentRepository {
    async fn company_ids_for_user(&self, user_id: Uuid) -> Result<Vec<i64>, ApiError> {
        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT company_id FROM user_companies WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    async fn insert_many(&self, user_id: Uuid, company_ids: &[i64]) -> Result<u64, ApiError> {
        if company_ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            r#"
            INSERT INTO user_companies (user_id, company_id)
            SELECT $1, company_id FROM UNNEST($2::BIGINT[]) AS t(company_id)
            "#,
        )
        .bind(user_id)
        .bind(company_ids)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn insert(&self, user_id: Uuid, company_id: i64) -> Result<(), ApiError> {
        sqlx::query("INSERT INTO user_companies (user_id, company_id) VALUES ($1, $2)")
            .bind(user_id)
            .bind(company_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_for_user(&self, user_id: Uuid) -> Result<u64, ApiError> {
        let result = sqlx::query("DELETE FROM user_companies WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
