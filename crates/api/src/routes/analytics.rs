//! First-party page analytics ingestion.
//!
//! The endpoint never reports failure to the browser: malformed events and
//! store errors are logged and dropped, and the response is always
//! `{"success": true}` unless the client is rate limited.

use axum::{body::Bytes, extract::State, Json};
use axum_extra::{headers::UserAgent, TypedHeader};
use domain::models::{AnalyticsRequest, NewAnalyticsEvent};
use serde::Serialize;
use validator::Validate;

use crate::app::AppState;
use crate::extractors::ClientFingerprint;
use crate::middleware::metrics::record_analytics_event;

/// Longest user agent kept with an event.
const MAX_USER_AGENT_LEN: usize = 512;

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub success: bool,
}

/// Parses and validates a raw body. `None` means the event is dropped.
fn parse_event(
    body: &[u8],
    ip_hash: String,
    user_agent: Option<String>,
) -> Option<NewAnalyticsEvent> {
    let request: AnalyticsRequest = match serde_json::from_slice(body) {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!(error = %e, "Dropping malformed analytics event");
            return None;
        }
    };
    if let Err(e) = request.validate() {
        tracing::debug!(error = %e, "Dropping invalid analytics event");
        return None;
    }
    Some(request.into_new_event(ip_hash, user_agent))
}

fn truncate_user_agent(agent: &str) -> String {
    agent.chars().take(MAX_USER_AGENT_LEN).collect()
}

/// Record a page event.
///
/// POST /api/analytics
pub async fn record_event(
    State(state): State<AppState>,
    fingerprint: ClientFingerprint,
    user_agent: Option<TypedHeader<UserAgent>>,
    body: Bytes,
) -> Json<AnalyticsResponse> {
    let user_agent = user_agent.map(|TypedHeader(agent)| truncate_user_agent(agent.as_str()));

    let accepted = match parse_event(&body, fingerprint.ip_hash, user_agent) {
        Some(event) => match state.store.record_event(event).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to store analytics event");
                false
            }
        },
        None => false,
    };
    record_analytics_event(accepted);

    Json(AnalyticsResponse { success: true })
}
