//! Security headers middleware.
//!
//! Adds the fixed set of security headers to every response.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

/// Header name constants.
pub mod headers {
    use axum::http::HeaderName;

    pub const X_CONTENT_TYPE_OPTIONS: HeaderName = HeaderName::from_static("x-content-type-options");
    pub const X_FRAME_OPTIONS: HeaderName = HeaderName::from_static("x-frame-options");
    pub const X_XSS_PROTECTION: HeaderName = HeaderName::from_static("x-xss-protection");
    pub const PERMISSIONS_POLICY: HeaderName = HeaderName::from_static("permissions-policy");
}

pub const HSTS_VALUE: &str = "max-age=31536000; includeSubDomains";

/// Options for [`security_headers_middleware`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SecurityHeaderOptions {
    /// Only enable behind proper TLS termination.
    pub hsts_enabled: bool,
}

/// Middleware that adds security headers to all responses.
///
/// Headers added:
/// - `X-Content-Type-Options: nosniff`
/// - `X-Frame-Options: SAMEORIGIN` (the admin theme editor frames the site)
/// - `X-XSS-Protection: 1; mode=block`
/// - `Referrer-Policy: strict-origin-when-cross-origin`
/// - `Permissions-Policy: camera=(), microphone=(), geolocation=()`
/// - `Strict-Transport-Security` when `security.hsts_enabled` is set
pub async fn security_headers_middleware(
    State(options): State<SecurityHeaderOptions>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let mut response = next.run(req).await;
    let response_headers = response.headers_mut();

    response_headers.insert(
        headers::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    response_headers.insert(
        headers::X_FRAME_OPTIONS,
        HeaderValue::from_static("SAMEORIGIN"),
    );
    response_headers.insert(
        headers::X_XSS_PROTECTION,
        HeaderValue::from_static("1; mode=block"),
    );
    response_headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    response_headers.insert(
        headers::PERMISSIONS_POLICY,
        HeaderValue::from_static("camera=(), microphone=(), geolocation=()"),
    );

    if options.hsts_enabled {
        response_headers.insert(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static(HSTS_VALUE),
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{middleware, routing::get, Router};
    use tower::ServiceExt;

    fn app(hsts_enabled: bool) -> Router {
        Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(middleware::from_fn_with_state(
                SecurityHeaderOptions { hsts_enabled },
                security_headers_middleware,
            ))
    }

    async fn call(hsts_enabled: bool) -> Response {
        app(hsts_enabled)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_fixed_headers_present() {
        let response = call(false).await;
        let h = response.headers();

        assert_eq!(h.get(headers::X_CONTENT_TYPE_OPTIONS).unwrap(), "nosniff");
        assert_eq!(h.get(headers::X_FRAME_OPTIONS).unwrap(), "SAMEORIGIN");
        assert_eq!(h.get(headers::X_XSS_PROTECTION).unwrap(), "1; mode=block");
        assert_eq!(
            h.get(header::REFERRER_POLICY).unwrap(),
            "strict-origin-when-cross-origin"
        );
        assert_eq!(
            h.get(headers::PERMISSIONS_POLICY).unwrap(),
            "camera=(), microphone=(), geolocation=()"
        );
    }

    #[tokio::test]
    async fn test_hsts_disabled_by_default() {
        let response = call(false).await;
        assert!(response.headers().get(header::STRICT_TRANSPORT_SECURITY).is_none());
    }

    #[tokio::test]
    async fn test_hsts_when_enabled() {
        let response = call(true).await;
        assert_eq!(
            response.headers().get(header::STRICT_TRANSPORT_SECURITY).unwrap(),
            HSTS_VALUE
        );
    }

    #[tokio::test]
    async fn test_headers_on_not_found() {
        let response = app(false)
            .oneshot(Request::builder().uri("/missing").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::NOT_FOUND);
        assert!(response.headers().get(headers::X_FRAME_OPTIONS).is_some());
    }
}
