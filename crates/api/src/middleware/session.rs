//! Admin session middleware.
//!
//! Sign-in happens against the hosted auth service; this layer only checks
//! that the request carries a valid access token, either in the
//! `sb-access-token` cookie or as a Bearer token.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;

pub const LOGIN_PATH: &str = "/admin/login";

/// Authenticated admin, stored in request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSession {
    pub user_id: Uuid,
    pub email: Option<String>,
}

impl From<shared::session::VerifiedSession> for AdminSession {
    fn from(session: shared::session::VerifiedSession) -> Self {
        Self {
            user_id: session.user_id,
            email: session.email,
        }
    }
}

/// Finds the session token: cookie first, then `Authorization: Bearer`.
pub fn session_token<'a>(state: &AppState, headers: &'a HeaderMap) -> Option<&'a str> {
    if let Some(token) = state.cookies.extract_access_token(headers) {
        return Some(token);
    }
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Verifies the request's session token.
pub fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<AdminSession, ApiError> {
    let token = session_token(state, headers)
        .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;

    state
        .session_verifier
        .verify(token)
        .map(AdminSession::from)
        .map_err(|e| {
            tracing::debug!(error = %e, "Session validation failed");
            ApiError::from(e)
        })
}

/// Gate for `/api/admin/*`: rejects with a 401 JSON body.
pub async fn require_admin_api(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    match authenticate(&state, req.headers()) {
        Ok(session) => {
            req.extensions_mut().insert(session);
            next.run(req).await
        }
        Err(e) => e.into_response(),
    }
}

/// Gate for `/admin/*` pages: redirects to the login page instead.
pub async fn require_admin_page(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if req.uri().path() == LOGIN_PATH {
        return next.run(req).await;
    }

    match authenticate(&state, req.headers()) {
        Ok(session) => {
            req.extensions_mut().insert(session);
            next.run(req).await
        }
        Err(_) => {
            let next_path = req
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str())
                .unwrap_or("/admin");
            login_redirect(next_path)
        }
    }
}

/// 302 to the login page, remembering where the user was going.
pub fn login_redirect(next_path: &str) -> Response {
    let location = login_location(next_path);
    match HeaderValue::from_str(&location) {
        Ok(value) => (StatusCode::FOUND, [(header::LOCATION, value)]).into_response(),
        Err(_) => (
            StatusCode::FOUND,
            [(header::LOCATION, HeaderValue::from_static(LOGIN_PATH))],
        )
            .into_response(),
    }
}

/// Builds `/admin/login?next=<path>`. Only same-site paths are remembered.
pub fn login_location(next_path: &str) -> String {
    if !next_path.starts_with('/') || next_path.starts_with("//") {
        return LOGIN_PATH.to_string();
    }
    reqwest::Url::parse_with_params(
        &format!("http://localhost{}", LOGIN_PATH),
        &[("next", next_path)],
    )
    .ok()
    .and_then(|url| url.query().map(|q| format!("{}?{}", LOGIN_PATH, q)))
    .unwrap_or_else(|| LOGIN_PATH.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_location_encodes_next() {
        assert_eq!(
            login_location("/admin/posts"),
            "/admin/login?next=%2Fadmin%2Fposts"
        );
    }

    #[test]
    fn test_login_location_keeps_query() {
        assert_eq!(
            login_location("/admin/intakes?status=new"),
            "/admin/login?next=%2Fadmin%2Fintakes%3Fstatus%3Dnew"
        );
    }

    #[test]
    fn test_login_location_rejects_offsite() {
        assert_eq!(login_location("https://evil.example"), LOGIN_PATH);
        assert_eq!(login_location("//evil.example/x"), LOGIN_PATH);
    }

    #[test]
    fn test_login_redirect_status() {
        let response = login_redirect("/admin");
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/admin/login?next=%2Fadmin"
        );
    }

    #[test]
    fn test_admin_session_from_verified() {
        let id = Uuid::new_v4();
        let session = AdminSession::from(shared::session::VerifiedSession {
            user_id: id,
            email: Some("owner@example.com".into()),
        });
        assert_eq!(session.user_id, id);
        assert_eq!(session.email.as_deref(), Some("owner@example.com"));
    }
}
