mod common;

use axum::http::{header, Method, StatusCode};
use common::{create_test_app, create_user, json_body, login, send, session_cookie, test_settings};
use serde_json::json;

#[tokio::test]
async fn login_sets_session_and_me_reports_full_name() {
    let (app, _store) = create_test_app(test_settings()).await;
    create_user(&app, "amara", "pw1", &[]).await;

    let response = send(&app, Method::GET, "/api/auth/me", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let me = json_body(response).await;
    assert_eq!(me["logged_in"], false);
    assert_eq!(me["display_name"], "Guest");

    let cookie = login(&app, "amara", "pw1").await;

    let me = json_body(send(&app, Method::GET, "/api/auth/me", Some(&cookie), None).await).await;
    assert_eq!(me["logged_in"], true);
    assert_eq!(me["display_name"], "amara Example");
    assert!(me["user"].get("password").is_none());
}

#[tokio::test]
async fn wrong_password_gets_generic_message() {
    let (app, _store) = create_test_app(test_settings()).await;
    create_user(&app, "amara", "pw1", &[]).await;

    let response = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "username": "amara", "password": "nope" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(session_cookie(&response).is_none());
    let body = json_body(response).await;
    assert_eq!(body["error"]["message"], "Invalid username or password");
}

#[tokio::test]
async fn duplicate_credentials_cannot_log_in() {
    let (app, _store) = create_test_app(test_settings()).await;
    create_user(&app, "twin", "same", &[]).await;
    create_user(&app, "twin", "same", &[]).await;

    let response = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "username": "twin", "password": "same" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_clears_the_session() {
    let (app, _store) = create_test_app(test_settings()).await;
    create_user(&app, "amara", "pw1", &[]).await;
    let cookie = login(&app, "amara", "pw1").await;

    let response = send(&app, Method::POST, "/api/auth/logout", Some(&cookie), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let cleared = session_cookie(&response).expect("logout should expire the cookie");
    assert_eq!(cleared, "session=");

    let response = send(&app, Method::GET, "/api/opportunities", Some(&cleared), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn opportunities_require_login() {
    let (app, _store) = create_test_app(test_settings()).await;

    let response = send(&app, Method::GET, "/api/opportunities", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(
        &app,
        Method::GET,
        "/api/opportunities",
        Some("session=not-a-valid-private-cookie"),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn user_without_assignments_sees_placeholder() {
    let (app, _store) = create_test_app(test_settings()).await;
    create_user(&app, "bao", "pw", &[]).await;
    let cookie = login(&app, "bao", "pw").await;

    let response = send(&app, Method::GET, "/api/opportunities", Some(&cookie), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "empty");
    assert_eq!(
        body["message"],
        "You don't have any companies assigned to you yet."
    );
}

#[tokio::test]
async fn user_sees_assigned_companies() {
    let (app, _store) = create_test_app(test_settings()).await;
    create_user(&app, "cato", "pw", &[2, 3]).await;
    let cookie = login(&app, "cato", "pw").await;

    let body = json_body(send(&app, Method::GET, "/api/opportunities", Some(&cookie), None).await).await;
    assert_eq!(body["status"], "available");

    let companies = body["companies"].as_array().unwrap();
    assert_eq!(companies.len(), 2);
    assert_eq!(companies[0]["name"], "Medicentres Canada Inc");
    assert_eq!(companies[1]["location"], "Regina, Saskatchewan");
}

#[tokio::test]
async fn backend_failure_is_reported_not_hidden() {
    let (app, store) = create_test_app(test_settings()).await;
    create_user(&app, "dev", "pw", &[1]).await;
    let cookie = login(&app, "dev", "pw").await;
    store.set_unreachable(true);

    let response = send(&app, Method::GET, "/api/opportunities", Some(&cookie), None).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "DATABASE_ERROR");
}

#[tokio::test]
async fn join_flow_must_go_through_each_step() {
    let (app, _store) = create_test_app(test_settings()).await;
    create_user(&app, "eli", "pw", &[1]).await;
    let mut cookie = login(&app, "eli", "pw").await;

    // Completing straight away is rejected
    let response = send(&app, Method::POST, "/api/join/complete", Some(&cookie), None).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = send(
        &app,
        Method::POST,
        "/api/join",
        Some(&cookie),
        Some(json!({ "company_name": "Torkin Manes LLP" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    cookie = session_cookie(&response).unwrap();
    let flow = json_body(response).await;
    assert_eq!(flow["state"], "join_prompt");
    assert_eq!(flow["company"], "Torkin Manes LLP");

    // Skipping "Apply Now" is rejected
    let response = send(&app, Method::POST, "/api/join/complete", Some(&cookie), None).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = send(&app, Method::POST, "/api/join/apply", Some(&cookie), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    cookie = session_cookie(&response).unwrap();
    assert_eq!(json_body(response).await["state"], "work_permit_form");

    let response = send(&app, Method::POST, "/api/join/complete", Some(&cookie), None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "https://pay.pesapal.com/iframe/PesapalIframe3/Index?OrderTrackingId=2fc6a799-63b8-452b-9c9a-dc4f11a1f174"
    );
    cookie = session_cookie(&response).unwrap();

    let flow = json_body(send(&app, Method::GET, "/api/join", Some(&cookie), None).await).await;
    assert_eq!(flow["state"], "idle");
}

#[tokio::test]
async fn closing_the_prompt_returns_to_idle() {
    let (app, _store) = create_test_app(test_settings()).await;
    create_user(&app, "fen", "pw", &[1]).await;
    let cookie = login(&app, "fen", "pw").await;

    let response = send(
        &app,
        Method::POST,
        "/api/join",
        Some(&cookie),
        Some(json!({ "company_name": "Brandt Group of Companies" })),
    )
    .await;
    let cookie = session_cookie(&response).unwrap();

    let response = send(&app, Method::DELETE, "/api/join", Some(&cookie), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response).unwrap();
    assert_eq!(json_body(response).await["state"], "idle");

    let response = send(&app, Method::POST, "/api/join/apply", Some(&cookie), None).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn blank_company_name_is_rejected() {
    let (app, _store) = create_test_app(test_settings()).await;
    create_user(&app, "gus", "pw", &[]).await;
    let cookie = login(&app, "gus", "pw").await;

    let response = send(
        &app,
        Method::POST,
        "/api/join",
        Some(&cookie),
        Some(json!({ "company_name": "  " })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn responses_carry_security_headers() {
    let (app, _store) = create_test_app(test_settings()).await;

    let response = send(&app, Method::GET, "/api/health", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
}
