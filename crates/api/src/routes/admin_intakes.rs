//! Admin intake (lead) management.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use domain::models::{Intake, IntakeFilter, IntakeStatus, UpdateIntakeRequest};
use serde::Deserialize;
use shared::pagination::{Page, PageParams};
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ValidatedJson;

#[derive(Debug, Default, Deserialize)]
pub struct AdminIntakesQuery {
    pub status: Option<IntakeStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Leads, newest first.
///
/// GET /api/admin/intakes
pub async fn list_intakes(
    State(state): State<AppState>,
    Query(query): Query<AdminIntakesQuery>,
) -> Result<Json<Page<Intake>>, ApiError> {
    let filter = IntakeFilter {
        status: query.status,
    };
    let page = state
        .store
        .list_intakes(filter, PageParams::new(query.limit, query.offset))
        .await?;
    Ok(Json(page))
}

/// GET /api/admin/intakes/:id
pub async fn get_intake(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Intake>, ApiError> {
    Ok(Json(state.store.get_intake(id).await?))
}

/// Move an intake along its workflow or edit its notes.
///
/// Transitions outside new → contacted → scheduled → completed (or to
/// declined from any open state) are rejected with 400.
///
/// PUT /api/admin/intakes/:id
pub async fn update_intake(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateIntakeRequest>,
) -> Result<Json<Intake>, ApiError> {
    let mut intake = state.store.get_intake(id).await?;
    let previous = intake.status;
    request.apply_to(&mut intake, Utc::now())?;
    let intake = state.store.save_intake(&intake).await?;

    if previous != intake.status {
        info!(intake_id = %id, from = %previous, to = %intake.status, "Intake status changed");
    }
    Ok(Json(intake))
}

/// DELETE /api/admin/intakes/:id
pub async fn delete_intake(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_intake(id).await?;
    info!(intake_id = %id, "Intake deleted");
    Ok(StatusCode::NO_CONTENT)
}
