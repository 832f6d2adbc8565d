use std::sync::Arc;

use crate::{
    config::{ConfigError, Settings},
    database::DatabasePool,
    repositories::{
        assignment_repo::SqlxAssignmentRepository, company_repo::SqlxCompanyRepository,
        user_repo::SqlxUserRepository, AssignmentRepository, CompanyRepository, MemoryStore,
        UserRepository,
    },
    services::{AdminService, AssignmentService, AuthService, SeedService},
};
use axum::{
    extract::FromRef,
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::Key;

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod services;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    /// `None` when running on the in-memory backend.
    pub db_pool: Option<DatabasePool>,
    pub seed_service: Arc<SeedService>,
    pub auth_service: Arc<AuthService>,
    pub assignment_service: Arc<AssignmentService>,
    pub admin_service: Arc<AdminService>,
    pub key: Key,
}

// Implement FromRef to allow extracting Key from AppState
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.key.clone()
    }
}

impl AppState {
    /// Create application state on the backend selected by `storage_backend`
    pub async fn from_settings(config: Settings) -> Result<Self, crate::error::ApiError> {
        if config.uses_memory_backend() {
            tracing::warn!("running on the in-memory backend; data is lost on exit");
            Self::in_memory(config)
        } else {
            Self::new(config).await
        }
    }

    /// Create new application state backed by PostgreSQL
    pub async fn new(config: Settings) -> Result<Self, crate::error::ApiError> {
        let db_pool = crate::database::create_connection_pool(&config.database_url).await?;
        Self::new_with_pool(config, db_pool)
    }

    /// Create new application state with existing database pool
    pub fn new_with_pool(
        config: Settings,
        db_pool: DatabasePool,
    ) -> Result<Self, crate::error::ApiError> {
        Self::build(
            config,
            Some(db_pool.clone()),
            Arc::new(SqlxCompanyRepository::new(db_pool.clone())),
            Arc::new(SqlxUserRepository::new(db_pool.clone())),
            Arc::new(SqlxAssignmentRepository::new(db_pool)),
        )
    }

    /// Application state over a fresh, empty in-memory backend
    pub fn in_memory(config: Settings) -> Result<Self, crate::error::ApiError> {
        Self::with_store(config, Arc::new(MemoryStore::new()))
    }

    /// Application state over a caller-owned in-memory backend, so tests can
    /// inspect it or switch on failures
    pub fn with_store(
        config: Settings,
        store: Arc<MemoryStore>,
    ) -> Result<Self, crate::error::ApiError> {
        Self::build(config, None, store.clone(), store.clone(), store)
    }

    fn build(
        config: Settings,
        db_pool: Option<DatabasePool>,
        company_repository: Arc<dyn CompanyRepository + Send + Sync>,
        user_repository: Arc<dyn UserRepository + Send + Sync>,
        assignment_repository: Arc<dyn AssignmentRepository + Send + Sync>,
    ) -> Result<Self, crate::error::ApiError> {
        let key = Key::try_from(config.auth_secret.as_bytes()).map_err(|e| {
            ConfigError::Validation(format!("auth_secret is not a usable cookie key: {}", e))
        })?;

        let seed_service = Arc::new(SeedService::new(
            company_repository.clone(),
            user_repository.clone(),
        ));
        let auth_service = Arc::new(AuthService::new(user_repository.clone()));
        let assignment_service = Arc::new(AssignmentService::new(
            assignment_repository.clone(),
            company_repository.clone(),
        ));
        let admin_service = Arc::new(AdminService::new(
            user_repository,
            company_repository,
            assignment_repository,
        ));

        Ok(Self {
            config: Arc::new(config),
            db_pool,
            seed_service,
            auth_service,
            assignment_service,
            admin_service,
            key,
        })
    }
}

/// Full HTTP router with every route and the global middleware stack
pub fn create_router(state: AppState) -> Router {
    let cors_layer = middleware::create_cors_layer(
        &state.config.cors_allow_origins,
        &state.config.admin_key_header,
    );

    // Public routes (Health + Auth)
    let public_routes = Router::new()
        .route("/api/health", get(handlers::health_check))
        .route("/api/health/simple", get(handlers::health_check_simple))
        .route("/api/health/live", get(handlers::liveness_check))
        .route("/api/auth/login", post(handlers::auth_handlers::login))
        .route("/api/auth/logout", post(handlers::auth_handlers::logout))
        .route("/api/auth/me", get(handlers::auth_handlers::get_me));

    // Routes for a logged-in user
    let session_routes = Router::new()
        .route(
            "/api/opportunities",
            get(handlers::opportunity_handlers::list_opportunities),
        )
        .route(
            "/api/join",
            get(handlers::join_handlers::get_flow)
                .post(handlers::join_handlers::start_join)
                .delete(handlers::join_handlers::close_flow),
        )
        .route("/api/join/apply", post(handlers::join_handlers::apply_now))
        .route("/api/join/complete", post(handlers::join_handlers::complete))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_session,
        ));

    // Admin panel
    let admin_routes = Router::new()
        .route(
            "/api/admin/users",
            get(handlers::admin_handlers::list_users).post(handlers::admin_handlers::create_user),
        )
        .route(
            "/api/admin/users/:id",
            axum::routing::delete(handlers::admin_handlers::delete_user),
        )
        .route(
            "/api/admin/users/:id/companies",
            post(handlers::admin_handlers::assign_company),
        )
        .route(
            "/api/admin/companies",
            get(handlers::admin_handlers::list_companies),
        )
        .route("/api/admin/seed", post(handlers::admin_handlers::run_seed))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::admin_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(session_routes)
        .merge(admin_routes)
        .with_state(state)
        // Apply middleware layers (global)
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(axum::middleware::from_fn(
            middleware::request_logging_middleware,
        ))
        .layer(middleware::create_logging_layer())
        .layer(cors_layer)
}
