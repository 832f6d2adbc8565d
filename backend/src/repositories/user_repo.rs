use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{NewUser, User, UserCompanyRow},
};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Bounded select used to tell whether the table is reachable.
    async fn check_table(&self) -> Result<(), ApiError>;
    /// Creates `users` and the `user_companies` link table.
    async fn create_table(&self) -> Result<(), ApiError>;
    /// Equality lookup on username and password. At most two rows are
    /// returned, which is enough for callers to tell "one" from "many".
    async fn find_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Vec<User>, ApiError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError>;
    async fn create(&self, user: &NewUser) -> Result<User, ApiError>;
    /// Returns the number of deleted rows.
    async fn delete(&self, id: Uuid) -> Result<u64, ApiError>;
    /// All users with their assigned companies expanded in one request.
    async fn list_with_companies(&self) -> Result<Vec<UserCompanyRow>, ApiError>;
}

pub struct SqlxUserRepository {
    pool: PgPool,
}

impl SqlxUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn check_table(&self) -> Result<(), ApiError> {
        sqlx::query("SELECT id FROM users LIMIT 1")
            .fetch_optional(&self.pool)
            .await?;

        Ok(())
    }

    async fn create_table(&self) -> Result<(), ApiError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id UUID PRIMARY KEY,
                username TEXT NOT NULL,
                password TEXT NOT NULL,
                email TEXT NOT NULL,
                full_name TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS user_companies (
                user_id UUID NOT NULL REFERENCES users(id),
                company_id BIGINT NOT NULL REFERENCES companies(id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Vec<User>, ApiError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password, email, full_name, created_at
            FROM users
            WHERE username = $1 AND password = $2
            LIMIT 2
            "#,
        )
        .bind(username)
        .bind(password)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password, email, full_name, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create(&self, user: &NewUser) -> Result<User, ApiError> {
        let row = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, password, email, full_name, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, username, password, email, full_name, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.username)
        .bind(&user.password)
        .bind(&user.email)
        .bind(&user.full_name)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> Result<u64, ApiError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn list_with_companies(&self) -> Result<Vec<UserCompanyRow>, ApiError> {
        let rows = sqlx::query_as::<_, UserCompanyRow>(
            r#"
            SELECT u.id AS user_id, u.username, u.email, u.full_name, u.created_at,
                   c.id AS company_id,
                   c.name AS company_name,
                   c.description AS company_description,
                   c.location AS company_location,
                   c.image AS company_image,
                   c.working_hours AS company_working_hours
            FROM users u
            LEFT JOIN user_companies uc ON uc.user_id = u.id
            LEFT JOIN companies c ON c.id = uc.company_id
            ORDER BY u.created_at, u.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
