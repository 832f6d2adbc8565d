use crate::auth::SessionContext;
use crate::models::CurrentUser;
use crate::{error::ApiError, AppState};
use axum::{extract::State, response::IntoResponse, Json};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct LoginParams {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub logged_in: bool,
    pub display_name: String,
    pub user: Option<CurrentUser>,
}

impl From<&SessionContext> for MeResponse {
    fn from(session: &SessionContext) -> Self {
        Self {
            logged_in: session.is_logged_in(),
            display_name: session.display_name().to_string(),
            user: session.current_user.clone(),
        }
    }
}

pub async fn login(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Json(params): Json<LoginParams>,
) -> Result<(PrivateCookieJar, Json<CurrentUser>), ApiError> {
    let user = state
        .auth_service
        .login(&params.username, &params.password)
        .await?;

    let session = SessionContext::logged_in(user.clone());
    let jar = session.store(jar, state.config.is_production())?;

    Ok((jar, Json(user)))
}

pub async fn logout(jar: PrivateCookieJar) -> (PrivateCookieJar, impl IntoResponse) {
    let jar = SessionContext::clear(jar);
    (jar, Json(MeResponse::from(&SessionContext::default())))
}

pub async fn get_me(jar: PrivateCookieJar) -> Json<MeResponse> {
    Json(MeResponse::from(&SessionContext::from_jar(&jar)))
}
