use crate::auth::{AdminContext, SessionContext};
use crate::error::ApiError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::PrivateCookieJar;

/// Session middleware for the user routes.
/// Resolves the session cookie and rejects requests without a logged-in user.
pub async fn require_session(
    jar: PrivateCookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let session = SessionContext::from_jar(&jar);

    if !session.is_logged_in() {
        tracing::debug!(uri = %request.uri(), "no logged-in user in session");
        return Err(ApiError::authentication("Login required"));
    }

    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

/// Admin guard.
/// Checks the configured header against the admin keys; open when no keys are set.
pub async fn admin_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let settings = &state.config;

    // Allow access if no admin keys configured (development mode only)
    if settings.admin_api_keys.is_empty() {
        request.extensions_mut().insert(AdminContext::Development);
        return Ok(next.run(request).await);
    }

    let presented = headers
        .get(settings.admin_key_header.as_str())
        .and_then(|value| value.to_str().ok());

    match presented {
        Some(key) if settings.admin_api_keys.iter().any(|k| k == key) => {
            request.extensions_mut().insert(AdminContext::ApiKey);
            Ok(next.run(request).await)
        }
        Some(_) => {
            tracing::warn!(uri = %request.uri(), "rejected admin request with unknown key");
            Err(ApiError::authorization("Invalid admin key"))
        }
        None => {
            tracing::debug!(uri = %request.uri(), "admin request without key");
            Err(ApiError::authentication("Admin key required"))
        }
    }
}
