//! Integration tests for the hosted-auth proxy endpoints.

mod common;

use axum::http::StatusCode;
use common::{json_request, spawn_app};
use serde_json::json;

#[tokio::test]
async fn test_login_validates_body() {
    let app = spawn_app();

    let response = app
        .send(json_request(
            "POST",
            "/api/auth/login",
            json!({ "email": "owner@studio.test" }),
        ))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_without_hosted_auth_is_unavailable() {
    let app = spawn_app();

    let response = app
        .send(json_request(
            "POST",
            "/api/auth/login",
            json!({ "email": "owner@studio.test", "password": "hunter22" }),
        ))
        .await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(response.headers.get("set-cookie").is_none());
}

#[tokio::test]
async fn test_logout_clears_session_cookies() {
    let app = spawn_app();

    let response = app
        .send(json_request("POST", "/api/auth/logout", json!({})))
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let cookies: Vec<&str> = response
        .headers
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect();
    assert_eq!(cookies.len(), 2);
    assert!(cookies.iter().all(|c| c.contains("Max-Age=0")));
    assert!(cookies.iter().any(|c| c.starts_with("sb-access-token=")));
}

#[tokio::test]
async fn test_reset_password_answers_generically() {
    let app = spawn_app();

    let response = app
        .send(json_request(
            "POST",
            "/api/auth/reset-password",
            json!({ "email": "someone@example.com" }),
        ))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["message"]
        .as_str()
        .unwrap()
        .starts_with("If an account exists"));
}

#[tokio::test]
async fn test_reset_password_rejects_bad_email() {
    let app = spawn_app();

    let response = app
        .send(json_request(
            "POST",
            "/api/auth/reset-password",
            json!({ "email": "nope" }),
        ))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
