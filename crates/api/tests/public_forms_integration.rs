//! Integration tests for the public intake, newsletter and analytics forms.

mod common;

use axum::http::StatusCode;
use common::{from_client, json_request, spawn_app, spawn_app_with};
use domain::models::{IntakeFilter, SubscriberFilter};
use domain::store::{IntakeStore, SubscriberStore};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use serde_json::json;
use shared::pagination::PageParams;

fn intake_body() -> serde_json::Value {
    let name: String = Name().fake();
    let email: String = SafeEmail().fake();
    json!({
        "name": name,
        "email": email,
        "service": "Brand shoot",
        "message": "We'd like to book a session next month."
    })
}

#[tokio::test]
async fn test_intake_created_with_hashed_ip() {
    let app = spawn_app();

    let response = app
        .send(from_client(
            json_request("POST", "/api/intake", intake_body()),
            "203.0.113.7",
        ))
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["success"], true);
    assert!(response.body["id"].is_string());

    let page = app
        .store
        .list_intakes(IntakeFilter::default(), PageParams::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    let stored = &page.data[0];
    let ip_hash = stored.ip_hash.as_deref().unwrap();
    assert_ne!(ip_hash, "203.0.113.7");
    assert!(!ip_hash.contains("203.0.113"));
}

#[tokio::test]
async fn test_intake_rejects_invalid_payload_without_storing() {
    let app = spawn_app();

    let missing_message = app
        .send(json_request(
            "POST",
            "/api/intake",
            json!({ "name": "Ada", "email": "ada@example.com" }),
        ))
        .await;
    assert_eq!(missing_message.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing_message.body["error"], "validation_error");

    let bad_email = app
        .send(json_request(
            "POST",
            "/api/intake",
            json!({ "name": "Ada", "email": "not-an-email", "message": "Hello" }),
        ))
        .await;
    assert_eq!(bad_email.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_email.body["details"][0]["field"], "email");

    let page = app
        .store
        .list_intakes(IntakeFilter::default(), PageParams::default())
        .await
        .unwrap();
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn test_intake_sixth_request_is_rate_limited() {
    let app = spawn_app();

    for _ in 0..5 {
        let response = app
            .send(from_client(
                json_request("POST", "/api/intake", intake_body()),
                "198.51.100.20",
            ))
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    let blocked = app
        .send(from_client(
            json_request("POST", "/api/intake", intake_body()),
            "198.51.100.20",
        ))
        .await;
    assert_eq!(blocked.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(blocked.body["error"], "rate_limit_exceeded");
    assert_eq!(blocked.header("x-ratelimit-limit"), Some("5"));
    assert_eq!(blocked.header("x-ratelimit-remaining"), Some("0"));
    assert!(blocked.header("x-ratelimit-reset").is_some());
    let retry_after: u64 = blocked.header("retry-after").unwrap().parse().unwrap();
    assert!(retry_after > 0 && retry_after <= 3600);
    // Security headers still apply to rejected requests.
    assert_eq!(blocked.header("x-content-type-options"), Some("nosniff"));

    // Another client is unaffected.
    let other = app
        .send(from_client(
            json_request("POST", "/api/intake", intake_body()),
            "198.51.100.21",
        ))
        .await;
    assert_eq!(other.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_rate_limit_windows_are_per_route() {
    let app = spawn_app();
    let ip = "192.0.2.44";

    for _ in 0..5 {
        app.send(from_client(
            json_request("POST", "/api/intake", intake_body()),
            ip,
        ))
        .await;
    }

    let email: String = SafeEmail().fake();
    let newsletter = app
        .send(from_client(
            json_request("POST", "/api/newsletter", json!({ "email": email })),
            ip,
        ))
        .await;
    assert_eq!(newsletter.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_newsletter_subscribe_flow() {
    let app = spawn_app();

    let first = app
        .send(json_request(
            "POST",
            "/api/newsletter",
            json!({ "email": "Reader@Example.com", "source": "footer" }),
        ))
        .await;
    assert_eq!(first.status, StatusCode::CREATED);
    assert_eq!(first.body["message"], "Subscribed successfully");

    let again = app
        .send(json_request(
            "POST",
            "/api/newsletter",
            json!({ "email": "reader@example.com" }),
        ))
        .await;
    assert_eq!(again.status, StatusCode::OK);
    assert_eq!(again.body["message"], "Already subscribed");

    let subscriber = app
        .store
        .find_subscriber_by_email("reader@example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(subscriber.is_active);

    let page = app
        .store
        .list_subscribers(SubscriberFilter::default(), PageParams::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
}

#[tokio::test]
async fn test_newsletter_reactivates_inactive_subscriber() {
    let app = spawn_app();
    let mut subscriber = app
        .store
        .create_subscriber("lapsed@example.com", None)
        .await
        .unwrap();
    subscriber.is_active = false;
    app.store.save_subscriber(&subscriber).await.unwrap();

    let response = app
        .send(json_request(
            "POST",
            "/api/newsletter",
            json!({ "email": "lapsed@example.com" }),
        ))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["message"], "Welcome back");

    let stored = app.store.get_subscriber(subscriber.id).await.unwrap();
    assert!(stored.is_active);
}

#[tokio::test]
async fn test_newsletter_fourth_request_is_rate_limited() {
    let app = spawn_app();

    for _ in 0..3 {
        let email: String = SafeEmail().fake();
        let response = app
            .send(from_client(
                json_request("POST", "/api/newsletter", json!({ "email": email })),
                "203.0.113.99",
            ))
            .await;
        assert_ne!(response.status, StatusCode::TOO_MANY_REQUESTS);
    }

    let blocked = app
        .send(from_client(
            json_request(
                "POST",
                "/api/newsletter",
                json!({ "email": "late@example.com" }),
            ),
            "203.0.113.99",
        ))
        .await;
    assert_eq!(blocked.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(blocked.header("x-ratelimit-limit"), Some("3"));
}

#[tokio::test]
async fn test_newsletter_invalid_email() {
    let app = spawn_app();

    let response = app
        .send(json_request(
            "POST",
            "/api/newsletter",
            json!({ "email": "nope" }),
        ))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_analytics_always_succeeds() {
    let app = spawn_app();

    let valid = app
        .send(json_request(
            "POST",
            "/api/analytics",
            json!({ "event_type": "page_view", "path": "/work", "referrer": "https://search.example" }),
        ))
        .await;
    assert_eq!(valid.status, StatusCode::OK);
    assert_eq!(valid.body["success"], true);

    let invalid = app
        .send(json_request(
            "POST",
            "/api/analytics",
            json!({ "event_type": "", "path": "/work" }),
        ))
        .await;
    assert_eq!(invalid.status, StatusCode::OK);
    assert_eq!(invalid.body["success"], true);

    let garbage = app
        .send(
            axum::http::Request::builder()
                .method("POST")
                .uri("/api/analytics")
                .header("content-type", "application/json")
                .body(axum::body::Body::from("{not json"))
                .unwrap(),
        )
        .await;
    assert_eq!(garbage.status, StatusCode::OK);

    assert_eq!(app.store.analytics_count().await, 1);
}

#[tokio::test]
async fn test_analytics_rate_limit_is_configurable() {
    let app = spawn_app_with(&[("security.rate_limits.analytics.max_requests", "2")]);

    for _ in 0..2 {
        let response = app
            .send(json_request(
                "POST",
                "/api/analytics",
                json!({ "event_type": "page_view", "path": "/" }),
            ))
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }

    let blocked = app
        .send(json_request(
            "POST",
            "/api/analytics",
            json!({ "event_type": "page_view", "path": "/" }),
        ))
        .await;
    assert_eq!(blocked.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(app.store.analytics_count().await, 2);
}

#[tokio::test]
async fn test_spoofed_proxy_headers_share_a_window_when_untrusted() {
    let app = spawn_app_with(&[("security.trust_proxy_headers", "false")]);

    for n in 0..3 {
        let email: String = SafeEmail().fake();
        let response = app
            .send(from_client(
                json_request("POST", "/api/newsletter", json!({ "email": email })),
                &format!("203.0.113.{}", n),
            ))
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    let email: String = SafeEmail().fake();
    let blocked = app
        .send(from_client(
            json_request("POST", "/api/newsletter", json!({ "email": email })),
            "203.0.113.99",
        ))
        .await;
    assert_eq!(blocked.status, StatusCode::TOO_MANY_REQUESTS);
}
