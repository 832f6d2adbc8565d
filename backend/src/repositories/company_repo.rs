use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    error::ApiError,
    models::{Company, NewCompany},
};

#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// Bounded select used to tell whether the table is reachable.
    async fn check_table(&self) -> Result<(), ApiError>;
    async fn create_table(&self) -> Result<(), ApiError>;
    /// Returns the number of inserted rows.
    async fn insert_many(&self, companies: &[NewCompany]) -> Result<u64, ApiError>;
    async fn list_by_ids(&self, ids: &[i64]) -> Result<Vec<Company>, ApiError>;
    async fn list_ordered_by_name(&self) -> Result<Vec<Company>, ApiError>;
}

pub struct SqlxCompanyRepository {
    pool: PgPool,
}

impl SqlxCompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompanyRepository for SqlxCompanyRepository {
    async fn check_table(&self) -> Result<(), ApiError> {
        sqlx::query("SELECT id FROM companies LIMIT 1")
            .fetch_optional(&self.pool)
            .await?;

        Ok(())
    }

    async fn create_table(&self) -> Result<(), ApiError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS companies (
                id BIGSERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                location TEXT NOT NULL DEFAULT '',
                image TEXT NOT NULL DEFAULT '',
                working_hours TEXT NOT NULL DEFAULT ''
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn insert_many(&self, companies: &[NewCompany]) -> Result<u64, ApiError> {
        if companies.is_empty() {
            return Ok(0);
        }

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO companies (name, description, location, image, working_hours) ",
        );
        builder.push_values(companies, |mut row, company| {
            row.push_bind(&company.name)
                .push_bind(&company.description)
                .push_bind(&company.location)
                .push_bind(&company.image)
                .push_bind(&company.working_hours);
        });

        let result = builder.build().execute(&self.pool).await?;

        Ok(result.rows_affected())
    }

    async fn list_by_ids(&self, ids: &[i64]) -> Result<Vec<Company>, ApiError> {
        let rows = sqlx::query_as::<_, Company>(
            r#"
            SELECT id, name, description, location, image, working_hours
            FROM companies
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn list_ordered_by_name(&self) -> Result<Vec<Company>, ApiError> {
        let rows = sqlx::query_as::<_, Company>(
            "SELECT id, name, description, location, image, working_hours FROM companies ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
