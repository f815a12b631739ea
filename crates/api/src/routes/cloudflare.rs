//! Cloudflare traffic analytics for the admin dashboard.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::AdminSession;
use crate::services::cloudflare::{ZoneAnalytics, DEFAULT_DAYS, MAX_DAYS};

#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsQuery {
    pub days: Option<u32>,
}

impl AnalyticsQuery {
    fn days(&self) -> Result<u32, ApiError> {
        match self.days {
            None => Ok(DEFAULT_DAYS),
            Some(days) if (1..=MAX_DAYS).contains(&days) => Ok(days),
            Some(_) => Err(ApiError::Validation(format!(
                "days must be between 1 and {}",
                MAX_DAYS
            ))),
        }
    }
}

/// Daily traffic for the configured zone.
///
/// GET /api/cloudflare?days=N
pub async fn zone_analytics(
    State(state): State<AppState>,
    session: AdminSession,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<ZoneAnalytics>, ApiError> {
    let days = query.days()?;
    tracing::debug!(user_id = %session.user_id, days, "Fetching zone analytics");

    let analytics = state
        .cloudflare
        .zone_analytics(days, Utc::now().date_naive())
        .await?;
    Ok(Json(analytics))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_defaults_and_bounds() {
        assert_eq!(AnalyticsQuery { days: None }.days().unwrap(), DEFAULT_DAYS);
        assert_eq!(AnalyticsQuery { days: Some(1) }.days().unwrap(), 1);
        assert_eq!(AnalyticsQuery { days: Some(30) }.days().unwrap(), 30);
        assert!(AnalyticsQuery { days: Some(0) }.days().is_err());
        assert!(AnalyticsQuery { days: Some(31) }.days().is_err());
    }
}
