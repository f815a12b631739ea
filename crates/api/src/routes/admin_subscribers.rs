//! Admin newsletter subscriber management.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use domain::models::{SetActiveRequest, Subscriber, SubscriberFilter};
use serde::Deserialize;
use shared::pagination::{Page, PageParams};
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ValidatedJson;

#[derive(Debug, Default, Deserialize)]
pub struct AdminSubscribersQuery {
    pub active: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/admin/subscribers
pub async fn list_subscribers(
    State(state): State<AppState>,
    Query(query): Query<AdminSubscribersQuery>,
) -> Result<Json<Page<Subscriber>>, ApiError> {
    let filter = SubscriberFilter {
        active: query.active,
    };
    let page = state
        .store
        .list_subscribers(filter, PageParams::new(query.limit, query.offset))
        .await?;
    Ok(Json(page))
}

/// Activate or deactivate a subscriber.
///
/// Repeating the same request returns the unchanged subscriber without
/// writing to the store.
///
/// PUT /api/admin/subscribers/:id/active
pub async fn set_active(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<SetActiveRequest>,
) -> Result<Json<Subscriber>, ApiError> {
    let mut subscriber = state.store.get_subscriber(id).await?;
    if !subscriber.set_active(request.active, Utc::now()) {
        return Ok(Json(subscriber));
    }

    let subscriber = state.store.save_subscriber(&subscriber).await?;
    info!(subscriber_id = %id, active = subscriber.is_active, "Subscriber toggled");
    Ok(Json(subscriber))
}

/// DELETE /api/admin/subscribers/:id
pub async fn delete_subscriber(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_subscriber(id).await?;
    info!(subscriber_id = %id, "Subscriber deleted");
    Ok(StatusCode::NO_CONTENT)
}
