//! Newsletter signup handler.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use domain::models::{NewsletterRequest, SubscribeOutcome};
use domain::store::{StoreError, SubscriberStore};
use serde::Serialize;
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ValidatedJson;
use crate::middleware::metrics::record_newsletter_signup;

#[derive(Debug, Serialize)]
pub struct NewsletterResponse {
    pub success: bool,
    pub message: String,
}

fn outcome_label(outcome: SubscribeOutcome) -> &'static str {
    match outcome {
        SubscribeOutcome::Created => "created",
        SubscribeOutcome::Reactivated => "reactivated",
        SubscribeOutcome::AlreadyActive => "already_active",
    }
}

/// Creates the subscriber, reactivates an unsubscribed one, or reports that
/// the address is already on the list.
async fn subscribe_email<S: SubscriberStore + ?Sized>(
    store: &S,
    request: &NewsletterRequest,
) -> Result<SubscribeOutcome, StoreError> {
    let email = request.normalized_email();

    if let Some(mut existing) = store.find_subscriber_by_email(&email).await? {
        if !existing.set_active(true, Utc::now()) {
            return Ok(SubscribeOutcome::AlreadyActive);
        }
        store.save_subscriber(&existing).await?;
        return Ok(SubscribeOutcome::Reactivated);
    }

    match store.create_subscriber(&email, request.source.as_deref()).await {
        Ok(_) => Ok(SubscribeOutcome::Created),
        // Lost a race with a concurrent signup for the same address.
        Err(StoreError::Conflict(_)) => Ok(SubscribeOutcome::AlreadyActive),
        Err(e) => Err(e),
    }
}

/// Subscribe to the newsletter.
///
/// POST /api/newsletter
pub async fn subscribe(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<NewsletterRequest>,
) -> Result<(StatusCode, Json<NewsletterResponse>), ApiError> {
    let outcome = subscribe_email(state.store.as_ref(), &request).await?;
    record_newsletter_signup(outcome_label(outcome));
    info!(outcome = outcome_label(outcome), "Newsletter signup");

    let (status, message) = match outcome {
        SubscribeOutcome::Created => (StatusCode::CREATED, "Subscribed successfully"),
        SubscribeOutcome::Reactivated => (StatusCode::CREATED, "Welcome back"),
        SubscribeOutcome::AlreadyActive => (StatusCode::OK, "Already subscribed"),
    };

    Ok((
        status,
        Json(NewsletterResponse {
            success: true,
            message: message.to_string(),
        }),
    ))
}
