//! Common test utilities for integration tests.
//!
//! Every test app runs against a fresh `MemoryStore`, so tests are
//! independent and need no database.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use domain::models::ThemeSettings;
use persistence::MemoryStore;
use serde_json::Value;
use site_api::{
    app::{create_app, AppState},
    config::Config,
    theme_hub::ThemeHub,
};
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "integration-test-jwt-secret-0123456789";
pub const TEST_IP_SALT: &str = "integration-test-salt";
pub const SITE_ORIGIN: &str = "https://studio.test";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<MemoryStore>,
}

/// Test configuration on top of the shipped defaults.
pub fn test_config(overrides: &[(&str, &str)]) -> Config {
    let mut all = vec![
        ("store.backend", "memory"),
        ("session.jwt_secret", TEST_JWT_SECRET),
        ("session.cookie_secure", "false"),
        ("security.ip_hash_salt", TEST_IP_SALT),
        ("security.site_origin", SITE_ORIGIN),
    ];
    all.extend_from_slice(overrides);
    let config = Config::load_from_str(include_str!("../../config/default.toml"), &all)
        .expect("test config");
    config.validate().expect("valid test config");
    config
}

pub fn spawn_app() -> TestApp {
    spawn_app_with(&[])
}

pub fn spawn_app_with(overrides: &[(&str, &str)]) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let hub = Arc::new(ThemeHub::new(store.clone(), ThemeSettings::default()));
    let state =
        AppState::new(test_config(overrides), store.clone(), hub).expect("test app state");
    TestApp {
        router: create_app(state.clone()),
        state,
        store,
    }
}

impl TestApp {
    /// Bearer token for a signed-in admin.
    pub fn admin_token(&self) -> String {
        self.state.session_verifier.issue_for_testing(
            Uuid::new_v4(),
            "owner@studio.test",
            "authenticated",
            3600,
        )
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn admin_json(&self, method: &str, uri: &str, body: Value) -> TestResponse {
        let token = self.admin_token();
        self.send(
            json_request(method, uri, body)
                .with_header(header::AUTHORIZATION.as_str(), &format!("Bearer {}", token)),
        )
        .await
    }

    pub async fn admin_get(&self, uri: &str) -> TestResponse {
        let token = self.admin_token();
        self.send(
            get_request(uri).with_header(header::AUTHORIZATION.as_str(), &format!("Bearer {}", token)),
        )
        .await
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

/// Adds a header to an already built request.
pub trait WithHeader {
    fn with_header(self, name: &str, value: &str) -> Self;
}

impl WithHeader for Request<Body> {
    fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers_mut().insert(
            header::HeaderName::from_bytes(name.as_bytes()).expect("header name"),
            header::HeaderValue::from_str(value).expect("header value"),
        );
        self
    }
}

/// Request coming from a specific client address via the CDN header.
pub fn from_client(request: Request<Body>, ip: &str) -> Request<Body> {
    request.with_header("cf-connecting-ip", ip)
}
