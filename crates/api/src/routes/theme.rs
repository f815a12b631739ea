//! Public theme endpoints.
//!
//! The site reads the persisted theme as JSON or CSS. Open pages (and the
//! admin preview frame) keep a server-sent event stream that pushes the
//! consumer's effective theme whenever it changes.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::header,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
    Json,
};
use domain::models::ThemeSettings;
use domain::services::ThemeProvider;
use futures_util::stream::{self, Stream, StreamExt};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::broadcast::{error::RecvError, Receiver};

use crate::app::AppState;
use crate::theme_hub::{ThemeBroadcast, ThemeHub};

/// SSE event name carrying a theme.
pub const THEME_EVENT: &str = "theme";

#[derive(Debug, Default, Deserialize)]
pub struct StreamQuery {
    /// Id of the preview frame; only previews addressed to it apply.
    pub preview: Option<String>,
}

/// GET /api/theme
pub async fn get_theme(State(state): State<AppState>) -> Json<ThemeSettings> {
    Json(state.theme_hub.current().await)
}

/// GET /api/theme.css
pub async fn get_theme_css(State(state): State<AppState>) -> impl IntoResponse {
    let css = state.theme_hub.current().await.to_css();
    (
        [
            (header::CONTENT_TYPE, "text/css; charset=utf-8"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        css,
    )
}

/// Builds the `theme` event: CSS variables plus the ready-made rule.
pub fn theme_event(theme: &ThemeSettings) -> Event {
    let variables: serde_json::Map<String, serde_json::Value> = theme
        .css_variables()
        .into_iter()
        .map(|(name, value)| (name.to_string(), serde_json::Value::String(value)))
        .collect();
    let payload = json!({
        "variables": variables,
        "css": theme.to_css(),
    });
    Event::default().event(THEME_EVENT).data(payload.to_string())
}

struct StreamState {
    hub: Arc<ThemeHub>,
    receiver: Receiver<ThemeBroadcast>,
    provider: ThemeProvider,
}

/// Waits for the next broadcast that changes this consumer's theme.
async fn next_theme(mut state: StreamState) -> Option<(Result<Event, Infallible>, StreamState)> {
    loop {
        let changed = match state.receiver.recv().await {
            Ok(event) => event.apply_to(&mut state.provider),
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Theme stream lagged, resyncing");
                let current = state.hub.current().await;
                state.provider.resync(current)
            }
            Err(RecvError::Closed) => return None,
        };
        if changed {
            let event = theme_event(state.provider.effective());
            return Some((Ok(event), state));
        }
    }
}

/// GET /api/theme/stream?preview=<id>
pub async fn theme_stream(
    State(state): State<AppState>,
    Query(query): Query<StreamQuery>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let hub = state.theme_hub.clone();
    // Subscribe before reading the current theme so no change slips between.
    let receiver = hub.subscribe();
    let provider = hub.provider_for(query.preview.as_deref()).await;
    tracing::debug!(previewing = query.preview.is_some(), "Theme stream opened");

    let initial = theme_event(provider.effective());
    let updates = stream::unfold(
        StreamState {
            hub,
            receiver,
            provider,
        },
        next_theme,
    );

    Sse::new(stream::once(async move { Ok(initial) }).chain(updates))
        .keep_alive(KeepAlive::default())
}
