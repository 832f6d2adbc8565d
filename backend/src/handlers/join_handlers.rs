use std::time::Duration;

use crate::auth::SessionContext;
use crate::models::JoinFlow;
use crate::{error::ApiError, AppState};
use axum::{
    extract::{Extension, State},
    response::Redirect,
    Json,
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct JoinRequest {
    pub company_name: String,
}

type FlowResponse = Result<(PrivateCookieJar, Json<JoinFlow>), ApiError>;

fn save_flow(
    state: &AppState,
    jar: PrivateCookieJar,
    mut session: SessionContext,
    flow: JoinFlow,
) -> FlowResponse {
    session.join_flow = flow.clone();
    let jar = session.store(jar, state.config.is_production())?;
    Ok((jar, Json(flow)))
}

pub async fn get_flow(Extension(session): Extension<SessionContext>) -> Json<JoinFlow> {
    Json(session.join_flow)
}

/// "Join" on a company card opens the join prompt.
pub async fn start_join(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Extension(session): Extension<SessionContext>,
    Json(request): Json<JoinRequest>,
) -> FlowResponse {
    let flow = session.join_flow.join(&request.company_name)?;
    tracing::debug!(company = %request.company_name, "join prompt opened");
    save_flow(&state, jar, session, flow)
}

/// "Apply Now" moves from the prompt to the work permit form.
pub async fn apply_now(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Extension(session): Extension<SessionContext>,
) -> FlowResponse {
    let flow = session.join_flow.apply_now()?;
    save_flow(&state, jar, session, flow)
}

/// Closing any modal.
pub async fn close_flow(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Extension(session): Extension<SessionContext>,
) -> FlowResponse {
    let flow = session.join_flow.close();
    save_flow(&state, jar, session, flow)
}

/// "Complete" on the work permit form. Waits the configured delay, then
/// sends the browser to the payment page. The session flow is back to idle
/// by the time the redirect is issued.
pub async fn complete(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Extension(mut session): Extension<SessionContext>,
) -> Result<(PrivateCookieJar, Redirect), ApiError> {
    let redirecting = session.join_flow.complete()?;
    tracing::info!(
        company = redirecting.company().unwrap_or_default(),
        "redirecting to payment"
    );

    if state.config.redirect_delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(state.config.redirect_delay_ms)).await;
    }

    session.join_flow = redirecting.close();
    let jar = session.store(jar, state.config.is_production())?;

    Ok((jar, Redirect::to(&state.config.payment_redirect_url())))
}
