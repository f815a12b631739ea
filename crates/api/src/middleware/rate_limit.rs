//! Rate limiting middleware for the public form endpoints.
//!
//! Fixed-window counters keyed by `(hashed client IP, route)`. State is
//! process-local and is lost on restart.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderName, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde_json::json;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
    time::{Duration, Instant},
};

use crate::config::RateLimitRule;
use crate::extractors::ClientFingerprint;
use crate::middleware::client_ip::client_ip_from_request;

pub const X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
pub const X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
pub const X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");

/// Route names used as the second half of the limiter key.
pub mod routes {
    pub const INTAKE: &str = "intake";
    pub const NEWSLETTER: &str = "newsletter";
    pub const ANALYTICS: &str = "analytics";
}

/// Cap and window length for one route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub max_requests: u32,
    pub window: Duration,
}

impl RateLimitPolicy {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
        }
    }
}

impl From<RateLimitRule> for RateLimitPolicy {
    fn from(rule: RateLimitRule) -> Self {
        Self::new(rule.max_requests, Duration::from_secs(rule.window_secs))
    }
}

/// Outcome of a single limiter check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Time until the current window closes.
    pub reset_after: Duration,
}

impl RateLimitDecision {
    /// Seconds a client should wait before retrying, never below 1.
    pub fn retry_after_secs(&self) -> u64 {
        let secs = self.reset_after.as_secs();
        let secs = if self.reset_after.subsec_nanos() > 0 {
            secs + 1
        } else {
            secs
        };
        secs.max(1)
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    length: Duration,
    count: u32,
}

impl Window {
    fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.started) >= self.length
    }
}

type WindowKey = (String, &'static str);

/// Fixed-window request counter.
///
/// A window opens on the first request for a key and closes `policy.window`
/// later. The first `max_requests` in a window are allowed, the rest denied.
#[derive(Default)]
pub struct FixedWindowLimiter {
    windows: Mutex<HashMap<WindowKey, Window>>,
}

impl FixedWindowLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a request for `key` on `route` and decides whether it may proceed.
    pub fn check(&self, key: &str, route: &'static str, policy: RateLimitPolicy) -> RateLimitDecision {
        self.check_at(key, route, policy, Instant::now())
    }

    pub fn check_at(
        &self,
        key: &str,
        route: &'static str,
        policy: RateLimitPolicy,
        now: Instant,
    ) -> RateLimitDecision {
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);
        let window = windows
            .entry((key.to_string(), route))
            .or_insert(Window {
                started: now,
                length: policy.window,
                count: 0,
            });

        if window.is_expired(now) {
            *window = Window {
                started: now,
                length: policy.window,
                count: 0,
            };
        }

        let reset_after = policy
            .window
            .saturating_sub(now.duration_since(window.started));

        if window.count >= policy.max_requests {
            return RateLimitDecision {
                allowed: false,
                limit: policy.max_requests,
                remaining: 0,
                reset_after,
            };
        }

        window.count += 1;
        RateLimitDecision {
            allowed: true,
            limit: policy.max_requests,
            remaining: policy.max_requests - window.count,
            reset_after,
        }
    }

    /// Drops windows that have closed. Returns how many were removed.
    pub fn sweep_expired(&self) -> usize {
        self.sweep_expired_at(Instant::now())
    }

    pub fn sweep_expired_at(&self, now: Instant) -> usize {
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);
        let before = windows.len();
        windows.retain(|_, window| !window.is_expired(now));
        before - windows.len()
    }

    /// Number of windows currently tracked.
    pub fn len(&self) -> usize {
        self.windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for FixedWindowLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixedWindowLimiter")
            .field("active_windows", &self.len())
            .finish()
    }
}

/// Middleware state for one rate-limited route.
#[derive(Clone)]
pub struct RateLimitScope {
    limiter: Arc<FixedWindowLimiter>,
    route: &'static str,
    policy: RateLimitPolicy,
    salt: Arc<str>,
    trust_proxy_headers: bool,
}

impl RateLimitScope {
    pub fn new(
        limiter: Arc<FixedWindowLimiter>,
        route: &'static str,
        policy: RateLimitPolicy,
        salt: &str,
        trust_proxy_headers: bool,
    ) -> Self {
        Self {
            limiter,
            route,
            policy,
            salt: Arc::from(salt),
            trust_proxy_headers,
        }
    }
}

/// Middleware that enforces the scope's fixed-window limit.
///
/// The client IP is hashed before it is used as a key. On success the hash is
/// stored in request extensions as a [`ClientFingerprint`].
pub async fn rate_limit_middleware(
    State(scope): State<RateLimitScope>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let client_ip = client_ip_from_request(&req, scope.trust_proxy_headers);
    let ip_hash = shared::crypto::hash_ip(&client_ip, &scope.salt);
    let decision = scope.limiter.check(&ip_hash, scope.route, scope.policy);

    if !decision.allowed {
        tracing::warn!(
            route = scope.route,
            limit = decision.limit,
            retry_after = decision.retry_after_secs(),
            "Rate limit exceeded"
        );
        metrics::counter!("rate_limit_rejections_total", "route" => scope.route).increment(1);
        return rate_limited_response(&decision, Utc::now());
    }

    req.extensions_mut().insert(ClientFingerprint { ip_hash });
    next.run(req).await
}

/// Builds the 429 response with retry and quota headers.
pub fn rate_limited_response(decision: &RateLimitDecision, now: DateTime<Utc>) -> Response {
    let retry_after = decision.retry_after_secs();
    let reset_at = now.timestamp().max(0) as u64 + retry_after;

    let body = json!({
        "error": "rate_limit_exceeded",
        "message": "Too many requests. Please try again later.",
        "retry_after": retry_after
    });

    let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
    let headers = response.headers_mut();
    headers.insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
    headers.insert(X_RATELIMIT_LIMIT, HeaderValue::from(decision.limit));
    headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(0u32));
    headers.insert(X_RATELIMIT_RESET, HeaderValue::from(reset_at));

    response
}
