//! Integration tests for the admin session gate and admin CRUD endpoints.

mod common;

use axum::http::StatusCode;
use common::{get_request, json_request, spawn_app, WithHeader};
use domain::models::IntakeRequest;
use domain::store::{IntakeStore, SubscriberStore};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_admin_api_requires_session() {
    let app = spawn_app();

    let response = app.send(get_request("/api/admin/intakes")).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "unauthorized");

    let forged = app
        .send(get_request("/api/admin/intakes").with_header("authorization", "Bearer not.a.jwt"))
        .await;
    assert_eq!(forged.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_page_redirects_to_login() {
    let app = spawn_app();

    let response = app.send(get_request("/admin/posts")).await;
    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(
        response.header("location"),
        Some("/admin/login?next=%2Fadmin%2Fposts")
    );

    let login = app.send(get_request("/admin/login")).await;
    assert_eq!(login.status, StatusCode::OK);
    assert_eq!(login.body["authenticated"], false);
}

#[tokio::test]
async fn test_admin_page_with_session_cookie() {
    let app = spawn_app();
    let token = app.admin_token();

    let response = app
        .send(
            get_request("/admin").with_header("cookie", &format!("sb-access-token={}", token)),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["authenticated"], true);
    assert_eq!(response.body["path"], "/admin");
}

#[tokio::test]
async fn test_post_slug_derivation_and_conflict() {
    let app = spawn_app();

    let created = app
        .admin_json(
            "POST",
            "/api/admin/posts",
            json!({
                "title": "Golden Hour Portraits!",
                "content": "Notes from the shoot.",
                "status": "published",
                "tags": ["portraits"]
            }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["slug"], "golden-hour-portraits");
    assert!(created.body["published_at"].is_string());

    let duplicate = app
        .admin_json(
            "POST",
            "/api/admin/posts",
            json!({ "title": "Golden hour portraits", "content": "Again." }),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let public = app.send(get_request("/api/posts/golden-hour-portraits")).await;
    assert_eq!(public.status, StatusCode::OK);
    assert_eq!(public.body["title"], "Golden Hour Portraits!");
}

#[tokio::test]
async fn test_draft_posts_are_hidden_publicly() {
    let app = spawn_app();

    let draft = app
        .admin_json(
            "POST",
            "/api/admin/posts",
            json!({ "title": "Work in progress", "content": "Soon." }),
        )
        .await;
    assert_eq!(draft.status, StatusCode::CREATED);
    assert_eq!(draft.body["status"], "draft");

    let public = app.send(get_request("/api/posts/work-in-progress")).await;
    assert_eq!(public.status, StatusCode::NOT_FOUND);

    let listing = app.send(get_request("/api/posts")).await;
    assert_eq!(listing.status, StatusCode::OK);
    assert_eq!(listing.body["total"], 0);

    let admin_listing = app.admin_get("/api/admin/posts").await;
    assert_eq!(admin_listing.body["total"], 1);
}

#[tokio::test]
async fn test_delete_post() {
    let app = spawn_app();

    let created = app
        .admin_json(
            "POST",
            "/api/admin/posts",
            json!({ "title": "Short lived", "content": "Bye." }),
        )
        .await;
    let id = created.body["id"].as_str().unwrap().to_string();

    let deleted = app
        .admin_json("DELETE", &format!("/api/admin/posts/{}", id), json!({}))
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let missing = app.admin_get(&format!("/api/admin/posts/{}", id)).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_intake_workflow_transitions() {
    let app = spawn_app();
    let intake = app
        .store
        .create_intake(
            IntakeRequest {
                name: "Grace".into(),
                email: "grace@example.com".into(),
                phone: None,
                company: None,
                service: Some("Headshots".into()),
                message: "Team headshots please".into(),
            }
            .into_new_intake(None),
        )
        .await
        .unwrap();
    let uri = format!("/api/admin/intakes/{}", intake.id);

    let contacted = app
        .admin_json("PUT", &uri, json!({ "status": "contacted", "notes": "Called back" }))
        .await;
    assert_eq!(contacted.status, StatusCode::OK);
    assert_eq!(contacted.body["status"], "contacted");
    assert_eq!(contacted.body["notes"], "Called back");

    let skip_ahead = app
        .admin_json("PUT", &uri, json!({ "status": "completed" }))
        .await;
    assert_eq!(skip_ahead.status, StatusCode::BAD_REQUEST);

    let stored = app.store.get_intake(intake.id).await.unwrap();
    assert_eq!(stored.status.as_str(), "contacted");

    let declined = app
        .admin_json("PUT", &uri, json!({ "status": "declined" }))
        .await;
    assert_eq!(declined.status, StatusCode::OK);

    let reopened = app.admin_json("PUT", &uri, json!({ "status": "new" })).await;
    assert_eq!(reopened.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_intake_is_not_found() {
    let app = spawn_app();

    let response = app
        .admin_get(&format!("/api/admin/intakes/{}", Uuid::new_v4()))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_subscriber_toggle_is_idempotent() {
    let app = spawn_app();
    let subscriber = app
        .store
        .create_subscriber("fan@example.com", Some("footer"))
        .await
        .unwrap();
    let uri = format!("/api/admin/subscribers/{}/active", subscriber.id);

    let off = app.admin_json("PUT", &uri, json!({ "active": false })).await;
    assert_eq!(off.status, StatusCode::OK);
    assert_eq!(off.body["is_active"], false);
    let first_update = off.body["unsubscribed_at"].clone();
    assert!(first_update.is_string());

    let again = app.admin_json("PUT", &uri, json!({ "active": false })).await;
    assert_eq!(again.status, StatusCode::OK);
    assert_eq!(again.body["is_active"], false);
    assert_eq!(again.body["unsubscribed_at"], first_update);

    let inactive = app.admin_get("/api/admin/subscribers?active=false").await;
    assert_eq!(inactive.body["total"], 1);

    let stored = app.store.get_subscriber(subscriber.id).await.unwrap();
    assert!(!stored.is_active);
}

#[tokio::test]
async fn test_cloudflare_analytics_gate() {
    let app = spawn_app();

    let anonymous = app.send(get_request("/api/cloudflare")).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let too_many_days = app.admin_get("/api/cloudflare?days=31").await;
    assert_eq!(too_many_days.status, StatusCode::BAD_REQUEST);

    // No token or zone configured in tests.
    let unconfigured = app.admin_get("/api/cloudflare").await;
    assert_eq!(unconfigured.status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_seo_settings_round_trip_through_admin() {
    let app = spawn_app();

    let updated = app
        .admin_json(
            "PUT",
            "/api/admin/seo",
            json!({ "site_title": "Lumen Studio", "site_description": "Portraits and events" }),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);

    let public = app.send(get_request("/api/seo")).await;
    assert_eq!(public.status, StatusCode::OK);
    assert_eq!(public.body["site_title"], "Lumen Studio");
}

#[tokio::test]
async fn test_admin_json_rejects_bad_body() {
    let app = spawn_app();
    let token = app.admin_token();

    let response = app
        .send(
            json_request("POST", "/api/admin/posts", json!({ "title": "" }))
                .with_header("authorization", &format!("Bearer {}", token)),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_subscriber_toggle_rejects_malformed_body() {
    let app = spawn_app();
    let subscriber = app
        .store
        .create_subscriber("typo@example.com", None)
        .await
        .unwrap();
    let uri = format!("/api/admin/subscribers/{}/active", subscriber.id);

    let response = app.admin_json("PUT", &uri, json!({ "active": "nope" })).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "validation_error");

    let stored = app.store.get_subscriber(subscriber.id).await.unwrap();
    assert!(stored.is_active);
}

#[tokio::test]
async fn test_content_block_lifecycle() {
    let app = spawn_app();

    let created = app
        .admin_json(
            "POST",
            "/api/admin/content",
            json!({
                "section": "home",
                "key": "hero-title",
                "title": "Hero",
                "body": "Light, honest portraits"
            }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.body["id"].as_str().unwrap().to_string();

    let duplicate = app
        .admin_json(
            "POST",
            "/api/admin/content",
            json!({ "section": "home", "key": "hero-title", "body": "Again" }),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let public = app.send(get_request("/api/content/home/hero-title")).await;
    assert_eq!(public.status, StatusCode::OK);
    assert_eq!(public.body["body"], "Light, honest portraits");

    let updated = app
        .admin_json(
            "PUT",
            &format!("/api/admin/content/{}", id),
            json!({ "body": "Portraits in natural light", "section": "services" }),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["body"], "Portraits in natural light");
    assert_eq!(updated.body["section"], "home");

    let deleted = app
        .admin_json("DELETE", &format!("/api/admin/content/{}", id), json!({}))
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let gone = app.send(get_request("/api/content/home/hero-title")).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_public_content_listing_filters_by_section() {
    let app = spawn_app();

    for (section, key, order) in [
        ("home", "hero-subtitle", 2),
        ("home", "hero-title", 1),
        ("services", "intro", 0),
    ] {
        let created = app
            .admin_json(
                "POST",
                "/api/admin/content",
                json!({ "section": section, "key": key, "sort_order": order }),
            )
            .await;
        assert_eq!(created.status, StatusCode::CREATED);
    }

    let home = app.send(get_request("/api/content?section=home")).await;
    assert_eq!(home.status, StatusCode::OK);
    assert_eq!(home.body["total"], 2);
    assert_eq!(home.body["data"][0]["key"], "hero-title");
    assert_eq!(home.body["data"][1]["key"], "hero-subtitle");

    let all = app.send(get_request("/api/content")).await;
    assert_eq!(all.body["total"], 3);

    let bad_key = app
        .admin_json(
            "POST",
            "/api/admin/content",
            json!({ "section": "home", "key": "Hero Title" }),
        )
        .await;
    assert_eq!(bad_key.status, StatusCode::BAD_REQUEST);
}
