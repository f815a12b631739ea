//! Health check endpoint handlers.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::app::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub store: StoreStatus,
    pub services: ServicesHealth,
}

/// External store reachability.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct StoreStatus {
    pub backend: String,
    pub connected: bool,
    pub latency_ms: Option<u64>,
}

/// Outbound integrations. Missing credentials are reported, not treated
/// as unhealthy.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ServicesHealth {
    pub hosted_auth_configured: bool,
    pub cloudflare_configured: bool,
    pub theme_streams: usize,
}

/// Simple status response for liveness/readiness probes.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

/// Full health check endpoint.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let start = std::time::Instant::now();
    let connected = state.store.ping().await.is_ok();
    let latency_ms = start.elapsed().as_millis() as u64;

    let response = HealthResponse {
        status: if connected { "healthy" } else { "unhealthy" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: StoreStatus {
            backend: state.store.backend_name().to_string(),
            connected,
            latency_ms: connected.then_some(latency_ms),
        },
        services: ServicesHealth {
            hosted_auth_configured: state.auth_client.is_configured(),
            cloudflare_configured: state.cloudflare.is_configured(),
            theme_streams: state.theme_hub.subscriber_count(),
        },
    };

    let status = if connected {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(response))
}

/// Liveness probe endpoint.
///
/// Returns 200 OK if the process is running.
pub async fn live() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "alive".to_string(),
    })
}

/// Readiness probe endpoint.
///
/// Returns 200 OK if the service can accept traffic (store reachable).
pub async fn ready(State(state): State<AppState>) -> Result<Json<StatusResponse>, StatusCode> {
    match state.store.ping().await {
        Ok(()) => Ok(Json(StatusResponse {
            status: "ready".to_string(),
        })),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
