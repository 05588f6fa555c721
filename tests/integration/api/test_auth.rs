// Integration tests for the token and login endpoints

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use codecamp_api::api::{create_router, AppState};
use codecamp_api::config::Config;
use codecamp_api::utils::time::SystemClock;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::common::*;

#[tokio::test]
async fn test_token_issued_for_valid_credentials() {
    let app = test_router();

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/auth/token",
            json!({"userName": USERNAME, "password": PASSWORD}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;

    let token = body["token"].as_str().unwrap();
    assert_eq!(token.split('.').count(), 3);
    assert!(body["expiration"].as_str().is_some());
}

#[tokio::test]
async fn test_token_accepts_lowercase_username_field() {
    let app = test_router();

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/auth/token",
            json!({"username": "jane", "password": "correct horse battery staple"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_token_failures_are_indistinguishable() {
    let cases = [
        json!({"userName": USERNAME, "password": "wrong"}),
        json!({"userName": "nobody", "password": PASSWORD}),
        json!({"userName": USERNAME, "password": ""}),
        json!({}),
    ];

    for credentials in cases {
        let app = test_router();
        let response = app
            .oneshot(json_request(Method::POST, "/api/auth/token", credentials))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body, json!({"error": "Failed to generate token"}));
    }
}

#[tokio::test]
async fn test_token_rejects_mistyped_body_generically() {
    let response = test_router()
        .oneshot(json_request(
            Method::POST,
            "/api/auth/token",
            json!({"username": 5, "password": "x"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body, json!({"error": "Failed to generate token"}));
}

#[tokio::test]
async fn test_login_rejects_unparseable_body_generically() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/login")
        .header(header::HOST, HOST)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("not json"))
        .unwrap();

    let response = test_router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().get("x-session-id").is_none());
    let body = read_json(response).await;
    assert_eq!(body, json!({"error": "Failed to login"}));
}

#[tokio::test]
async fn test_login_returns_session_header() {
    let app = test_router();

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/auth/login",
            json!({"userName": USERNAME, "password": PASSWORD}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let session_id = response
        .headers()
        .get("x-session-id")
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(session_id.starts_with("1."));
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let app = test_router();

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/auth/login",
            json!({"userName": USERNAME, "password": "P@ssw0rd"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().get("x-session-id").is_none());
    let body = read_json(response).await;
    assert_eq!(body["error"], "Failed to login");
}

#[tokio::test]
async fn test_login_and_token_agree_per_credential() {
    let cases = [
        (USERNAME, PASSWORD, true),
        (USERNAME, "nope", false),
        ("jane", "correct horse battery staple", true),
        ("ghost", PASSWORD, false),
    ];

    for (username, password, expected) in cases {
        let credentials = json!({"userName": username, "password": password});

        let login = test_router()
            .oneshot(json_request(Method::POST, "/api/auth/login", credentials.clone()))
            .await
            .unwrap();
        let token = test_router()
            .oneshot(json_request(Method::POST, "/api/auth/token", credentials))
            .await
            .unwrap();

        assert_eq!(login.status() == StatusCode::OK, expected);
        assert_eq!(token.status() == StatusCode::OK, expected);
    }
}

#[tokio::test]
async fn test_identity_store_outage_is_generic_400() {
    let app_state = AppState::new(
        Config::test_config(),
        seeded_store(),
        Arc::new(FailingIdentityStore),
        Arc::new(SystemClock),
    )
    .unwrap();
    let router = create_router(app_state);
    let credentials = json!({"userName": USERNAME, "password": PASSWORD});

    let token = router
        .clone()
        .oneshot(json_request(Method::POST, "/api/auth/token", credentials.clone()))
        .await
        .unwrap();
    assert_eq!(token.status(), StatusCode::BAD_REQUEST);
    let body = read_json(token).await;
    assert_eq!(body["error"], "Failed to generate token");
    assert!(!body.to_string().contains("db-01"));

    let login = router
        .oneshot(json_request(Method::POST, "/api/auth/login", credentials))
        .await
        .unwrap();
    assert_eq!(login.status(), StatusCode::BAD_REQUEST);
}
