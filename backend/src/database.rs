use crate::error::ApiError;
use sqlx::{postgres::PgPoolOptions, Pool, Postgres};

pub type DatabasePool = Pool<Postgres>;

/// Connects to PostgreSQL. Tables are created by the seed initializer, not
/// by a migration run here.
pub async fn create_connection_pool(database_url: &str) -> Result<DatabasePool, ApiError> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    tracing::info!("database connection pool created");
    Ok(pool)
}

pub async fn health_check(pool: &DatabasePool) -> Result<(), ApiError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
