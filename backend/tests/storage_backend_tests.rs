mod common;

use axum::http::{Method, StatusCode};
use common::{create_user, json_body, login, send, test_settings};
use onboard_backend::{create_router, AppState};

#[tokio::test]
async fn memory_backend_serves_the_full_app() {
    let mut settings = test_settings();
    settings.storage_backend = "memory".to_string();

    let state = AppState::from_settings(settings).await.unwrap();
    assert!(state.db_pool.is_none());

    let report = state.seed_service.initialize().await.unwrap();
    assert_eq!(report.companies_inserted, 3);
    assert!(report.users_created);

    let app = create_router(state);

    let health = json_body(send(&app, Method::GET, "/api/health", None, None).await).await;
    assert_eq!(health["checks"]["database"]["message"], "In-memory backend");

    create_user(&app, "oli", "pw", &[1]).await;
    let cookie = login(&app, "oli", "pw").await;

    let response = send(&app, Method::GET, "/api/opportunities", Some(&cookie), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["companies"][0]["name"], "Torkin Manes LLP");
}

#[tokio::test]
async fn in_memory_state_starts_without_tables() {
    let state = AppState::in_memory(test_settings()).unwrap();
    let app = create_router(state);

    // Nothing seeded yet, so the admin listing hits a missing table
    let response = send(&app, Method::GET, "/api/admin/companies", None, None).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = send(&app, Method::POST, "/api/admin/seed", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["companies_inserted"], 3);

    let companies = json_body(send(&app, Method::GET, "/api/admin/companies", None, None).await).await;
    assert_eq!(companies.as_array().unwrap().len(), 3);
}
