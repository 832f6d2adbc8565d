#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request},
    response::Response,
    Router,
};
use onboard_backend::{config::Settings, create_router, repositories::MemoryStore, AppState};
use serde_json::Value;
use tower::ServiceExt;

/// Settings for router tests: no redirect delay and open admin routes.
pub fn test_settings() -> Settings {
    let mut settings =
        Settings::new_with_env_file(false).expect("Failed to create test config");
    settings.redirect_delay_ms = 0;
    settings.admin_api_keys = Vec::new();
    settings.cors_allow_origins = vec!["*".to_string()];
    settings
}

/// Router over a seeded in-memory backend. The store is returned so tests
/// can inspect rows or switch on failures.
pub async fn create_test_app(settings: Settings) -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state =
        AppState::with_store(settings, store.clone()).expect("Failed to create test app state");
    state
        .seed_service
        .initialize()
        .await
        .expect("Failed to seed in-memory backend");
    (create_router(state), store)
}

/// Sends one request through the router, optionally with a session cookie
/// and a JSON body.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

/// The `session=...` pair from a response's Set-Cookie header, ready to be
/// sent back as a Cookie header.
pub fn session_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("session="))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

/// Helper to extract response body as JSON
pub async fn json_body(response: Response) -> Value {
    let body = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Creates a user through the admin API and returns the created record.
pub async fn create_user(app: &Router, username: &str, password: &str, company_ids: &[i64]) -> Value {
    let response = send(
        app,
        Method::POST,
        "/api/admin/users",
        None,
        Some(serde_json::json!({
            "username": username,
            "password": password,
            "email": format!("{}@example.com", username),
            "full_name": format!("{} Example", username),
            "company_ids": company_ids,
        })),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    json_body(response).await
}

/// Logs in and returns the session cookie.
pub async fn login(app: &Router, username: &str, password: &str) -> String {
    let response = send(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(serde_json::json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);
    session_cookie(&response).expect("login should set a session cookie")
}
