use crate::auth::AdminContext;
use crate::models::{Company, NewUser, UserWithCompanies};
use crate::services::SeedReport;
use crate::{error::ApiError, AppState};
use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Deserialize)]
pub struct CreateUserRequest {
    #[serde(flatten)]
    pub user: NewUser,
    #[serde(default)]
    pub company_ids: Vec<i64>,
}

#[derive(Deserialize)]
pub struct AssignCompanyRequest {
    pub company_id: i64,
}

pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserWithCompanies>>, ApiError> {
    let users = state.admin_service.list_users().await?;
    Ok(Json(users))
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserWithCompanies>), ApiError> {
    let user = state
        .admin_service
        .create_user(payload.user, &payload.company_ids)
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminContext>,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    tracing::info!(user_id = %user_id, api_key = admin.is_api_key(), "admin deleting user");
    state.admin_service.delete_user(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn assign_company(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<AssignCompanyRequest>,
) -> Result<Json<UserWithCompanies>, ApiError> {
    let user = state
        .admin_service
        .assign_company(user_id, payload.company_id)
        .await?;
    Ok(Json(user))
}

pub async fn list_companies(
    State(state): State<AppState>,
) -> Result<Json<Vec<Company>>, ApiError> {
    let companies = state.admin_service.list_companies().await?;
    Ok(Json(companies))
}

/// Re-runs the table initializer. Safe to call repeatedly.
pub async fn run_seed(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminContext>,
) -> Result<Json<SeedReport>, ApiError> {
    tracing::info!(api_key = admin.is_api_key(), "admin re-running initializer");
    let report = state.seed_service.initialize().await?;
    Ok(Json(report))
}
