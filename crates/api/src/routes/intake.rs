//! Contact/intake form handler.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::IntakeRequest;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{ClientFingerprint, ValidatedJson};
use crate::middleware::metrics::record_intake_submitted;

#[derive(Debug, Serialize)]
pub struct IntakeResponse {
    pub success: bool,
    pub id: Uuid,
}

/// Submit a new lead.
///
/// POST /api/intake
pub async fn submit_intake(
    State(state): State<AppState>,
    fingerprint: ClientFingerprint,
    ValidatedJson(request): ValidatedJson<IntakeRequest>,
) -> Result<(StatusCode, Json<IntakeResponse>), ApiError> {
    let intake = state
        .store
        .create_intake(request.into_new_intake(Some(fingerprint.ip_hash)))
        .await?;

    record_intake_submitted();
    info!(intake_id = %intake.id, service = ?intake.service, "Intake submitted");

    Ok((
        StatusCode::CREATED,
        Json(IntakeResponse {
            success: true,
            id: intake.id,
        }),
    ))
}
