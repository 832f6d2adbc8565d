//! Repository tests against a real PostgreSQL server.
//!
//! Each test runs in its own freshly created schema, so the tables start out
//! missing just like on a new database. Tests are skipped when
//! `DATABASE_URL` is not set.

use std::sync::Arc;

use onboard_backend::{
    error::ApiError,
    models::NewUser,
    repositories::{
        assignment_repo::SqlxAssignmentRepository, company_repo::SqlxCompanyRepository,
        user_repo::SqlxUserRepository, UserRepository,
    },
    services::{AdminService, AssignmentService, OpportunityList, SeedReport, SeedService},
};
use sqlx::{postgres::PgPoolOptions, Executor, PgPool};
use uuid::Uuid;

struct TestSchema {
    admin: PgPool,
    pool: PgPool,
    name: String,
}

impl TestSchema {
    /// Connects with `search_path` pinned to a new empty schema.
    async fn create() -> Option<Self> {
        let Ok(db_url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set, skipping PostgreSQL test");
            return None;
        };

        let admin = PgPool::connect(&db_url)
            .await
            .expect("Failed to connect to test database");

        let name = format!("onboard_test_{}", Uuid::new_v4().simple());
        admin
            .execute(format!("CREATE SCHEMA {}", name).as_str())
            .await
            .expect("Failed to create test schema");

        let search_path = format!("SET search_path TO {}", name);
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .after_connect(move |conn, _meta| {
                let search_path = search_path.clone();
                Box::pin(async move {
                    conn.execute(search_path.as_str()).await?;
                    Ok(())
                })
            })
            .connect(&db_url)
            .await
            .expect("Failed to connect with test schema");

        Some(Self { admin, pool, name })
    }

    fn seed_service(&self) -> SeedService {
        SeedService::new(
            Arc::new(SqlxCompanyRepository::new(self.pool.clone())),
            Arc::new(SqlxUserRepository::new(self.pool.clone())),
        )
    }

    fn admin_service(&self) -> AdminService {
        AdminService::new(
            Arc::new(SqlxUserRepository::new(self.pool.clone())),
            Arc::new(SqlxCompanyRepository::new(self.pool.clone())),
            Arc::new(SqlxAssignmentRepository::new(self.pool.clone())),
        )
    }

    async fn count(&self, sql: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(sql)
            .fetch_one(&self.pool)
            .await
            .expect("count query failed")
    }

    async fn teardown(self) {
        self.pool.close().await;
        self.admin
            .execute(format!("DROP SCHEMA {} CASCADE", self.name).as_str())
            .await
            .expect("Failed to drop test schema");
    }
}

fn new_user(username: &str) -> NewUser {
    NewUser {
        username: username.to_string(),
        password: "pw".to_string(),
        email: format!("{}@example.com", username),
        full_name: format!("{} Example", username),
    }
}

#[tokio::test]
async fn seeding_empty_schema_inserts_three_companies_once() {
    let Some(schema) = TestSchema::create().await else {
        return;
    };
    let seed = schema.seed_service();

    let report = seed.initialize().await.unwrap();
    assert_eq!(
        report,
        SeedReport {
            companies_created: true,
            companies_inserted: 3,
            users_created: true,
        }
    );
    assert_eq!(schema.count("SELECT COUNT(*) FROM companies").await, 3);

    let names: Vec<String> = sqlx::query_scalar("SELECT name FROM companies ORDER BY name")
        .fetch_all(&schema.pool)
        .await
        .unwrap();
    assert_eq!(
        names,
        vec![
            "Brandt Group of Companies",
            "Medicentres Canada Inc",
            "Torkin Manes LLP"
        ]
    );

    let report = seed.initialize().await.unwrap();
    assert_eq!(report, SeedReport::default());
    assert_eq!(schema.count("SELECT COUNT(*) FROM companies").await, 3);

    schema.teardown().await;
}

#[tokio::test]
async fn creating_user_writes_one_assignment_per_company() {
    let Some(schema) = TestSchema::create().await else {
        return;
    };
    schema.seed_service().initialize().await.unwrap();
    let admin = schema.admin_service();

    let user = admin.create_user(new_user("pia"), &[1, 2, 3]).await.unwrap();
    assert_eq!(user.companies.len(), 3);

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_companies WHERE user_id = $1")
        .bind(user.id)
        .fetch_one(&schema.pool)
        .await
        .unwrap();
    assert_eq!(rows, 3);

    // LEFT JOIN expansion groups back into one entry per user
    admin.create_user(new_user("rex"), &[]).await.unwrap();
    let users = admin.list_users().await.unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].username, "pia");
    assert_eq!(users[0].companies.len(), 3);
    assert!(users[1].companies.is_empty());

    // Id lookup through = ANY
    let opportunities = AssignmentService::new(
        Arc::new(SqlxAssignmentRepository::new(schema.pool.clone())),
        Arc::new(SqlxCompanyRepository::new(schema.pool.clone())),
    )
    .opportunities_for(user.id)
    .await
    .unwrap();
    assert!(matches!(opportunities, OpportunityList::Available { ref companies } if companies.len() == 3));

    schema.teardown().await;
}

#[tokio::test]
async fn delete_removes_assignments_before_user() {
    let Some(schema) = TestSchema::create().await else {
        return;
    };
    schema.seed_service().initialize().await.unwrap();
    let admin = schema.admin_service();
    let user = admin.create_user(new_user("sia"), &[1, 3]).await.unwrap();

    // The foreign key refuses a user delete while assignments exist
    let users = SqlxUserRepository::new(schema.pool.clone());
    assert!(UserRepository::delete(&users, user.id).await.is_err());

    admin.delete_user(user.id).await.unwrap();
    assert_eq!(schema.count("SELECT COUNT(*) FROM user_companies").await, 0);
    assert_eq!(schema.count("SELECT COUNT(*) FROM users").await, 0);

    assert!(matches!(
        admin.delete_user(user.id).await,
        Err(ApiError::NotFound(_))
    ));

    schema.teardown().await;
}
