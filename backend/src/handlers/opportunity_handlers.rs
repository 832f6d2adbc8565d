use crate::auth::SessionContext;
use crate::services::OpportunityList;
use crate::{error::ApiError, AppState};
use axum::{
    extract::{Extension, State},
    Json,
};

/// Companies assigned to the logged-in user.
pub async fn list_opportunities(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
) -> Result<Json<OpportunityList>, ApiError> {
    let user = session
        .current_user
        .ok_or_else(|| ApiError::authentication("Login required"))?;

    let list = state.assignment_service.opportunities_for(user.id).await?;
    Ok(Json(list))
}
