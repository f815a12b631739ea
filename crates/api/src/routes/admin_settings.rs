//! Admin theme and SEO settings, plus live theme previews.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    Json,
};
use chrono::Utc;
use domain::models::{SeoSettings, ThemeSettings, UpdateSeoRequest, UpdateThemeRequest};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ValidatedJson;

/// Unsaved theme for one preview frame.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PreviewRequest {
    #[validate(length(min = 1, max = 100, message = "Preview id must be 1-100 characters"))]
    pub preview_id: String,

    #[validate(nested)]
    pub theme: UpdateThemeRequest,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ClearPreviewRequest {
    #[validate(length(min = 1, max = 100, message = "Preview id must be 1-100 characters"))]
    pub preview_id: String,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub success: bool,
    pub preview_id: String,
    /// Number of open theme streams the message was offered to.
    pub delivered_to: usize,
}

/// Preview messages must come from the site itself. Requests without an
/// `Origin` header (non-browser clients) are let through.
fn check_preview_origin(headers: &HeaderMap, site_origin: &str) -> Result<(), ApiError> {
    match headers.get(header::ORIGIN).and_then(|v| v.to_str().ok()) {
        None => Ok(()),
        Some(origin) if origin.trim_end_matches('/') == site_origin.trim_end_matches('/') => Ok(()),
        Some(origin) => {
            tracing::warn!(origin, "Rejected cross-origin theme preview");
            Err(ApiError::Forbidden(
                "Theme previews are only accepted from the site origin".to_string(),
            ))
        }
    }
}

/// GET /api/admin/theme
pub async fn get_theme(State(state): State<AppState>) -> Result<Json<ThemeSettings>, ApiError> {
    Ok(Json(state.store.get_theme().await?))
}

/// Persist theme changes and push them to every open page.
///
/// PUT /api/admin/theme
pub async fn update_theme(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<UpdateThemeRequest>,
) -> Result<Json<ThemeSettings>, ApiError> {
    let current = state.store.get_theme().await?;
    let theme = state
        .store
        .save_theme(&request.merged_onto(&current, Utc::now()))
        .await?;

    state.theme_hub.publish_persisted(theme.clone()).await;
    info!("Theme settings updated");
    Ok(Json(theme))
}

/// Show an unsaved theme in one preview frame.
///
/// POST /api/admin/theme/preview
pub async fn preview_theme(
    State(state): State<AppState>,
    headers: HeaderMap,
    ValidatedJson(request): ValidatedJson<PreviewRequest>,
) -> Result<(StatusCode, Json<PreviewResponse>), ApiError> {
    check_preview_origin(&headers, &state.config.security.site_origin)?;

    let base = state.theme_hub.current().await;
    let theme = request.theme.merged_onto(&base, Utc::now());
    state.theme_hub.preview(request.preview_id.clone(), theme);

    Ok((
        StatusCode::ACCEPTED,
        Json(PreviewResponse {
            success: true,
            preview_id: request.preview_id,
            delivered_to: state.theme_hub.subscriber_count(),
        }),
    ))
}

/// Return a preview frame to the persisted theme.
///
/// POST /api/admin/theme/preview/clear
pub async fn clear_preview(
    State(state): State<AppState>,
    headers: HeaderMap,
    ValidatedJson(request): ValidatedJson<ClearPreviewRequest>,
) -> Result<(StatusCode, Json<PreviewResponse>), ApiError> {
    check_preview_origin(&headers, &state.config.security.site_origin)?;

    state.theme_hub.clear_preview(request.preview_id.clone());

    Ok((
        StatusCode::ACCEPTED,
        Json(PreviewResponse {
            success: true,
            preview_id: request.preview_id,
            delivered_to: state.theme_hub.subscriber_count(),
        }),
    ))
}

/// GET /api/admin/seo
pub async fn get_seo(State(state): State<AppState>) -> Result<Json<SeoSettings>, ApiError> {
    Ok(Json(state.store.get_seo().await?))
}

/// PUT /api/admin/seo
pub async fn update_seo(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<UpdateSeoRequest>,
) -> Result<Json<SeoSettings>, ApiError> {
    let mut seo = state.store.get_seo().await?;
    request.apply_to(&mut seo, Utc::now());
    let seo = state.store.save_seo(&seo).await?;
    info!("SEO settings updated");
    Ok(Json(seo))
}
