//! Site analytics domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// A recorded page-view or interaction event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AnalyticsEvent {
    pub id: Uuid,
    pub event_type: String,
    pub path: String,
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
    pub session_id: Option<String>,
    pub metadata: serde_json::Value,
    pub ip_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Public analytics beacon (`POST /api/analytics`).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct AnalyticsRequest {
    #[validate(length(min = 1, max = 50, message = "Event type must be 1-50 characters"))]
    pub event_type: String,

    #[validate(length(min = 1, max = 2048, message = "Path must be 1-2048 characters"))]
    pub path: String,

    #[validate(length(max = 2048, message = "Referrer must be at most 2048 characters"))]
    pub referrer: Option<String>,

    #[validate(length(max = 100, message = "Session ID must be at most 100 characters"))]
    pub session_id: Option<String>,

    #[serde(default = "empty_object")]
    #[validate(custom(function = "validate_metadata"))]
    pub metadata: serde_json::Value,
}

/// Values for a new analytics row.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAnalyticsEvent {
    pub event_type: String,
    pub path: String,
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
    pub session_id: Option<String>,
    pub metadata: serde_json::Value,
    pub ip_hash: String,
}

impl AnalyticsRequest {
    pub fn into_new_event(self, ip_hash: String, user_agent: Option<String>) -> NewAnalyticsEvent {
        NewAnalyticsEvent {
            event_type: self.event_type,
            path: self.path,
            referrer: self.referrer.filter(|r| !r.is_empty()),
            user_agent,
            session_id: self.session_id,
            metadata: self.metadata,
            ip_hash,
        }
    }
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

fn validate_metadata(value: &serde_json::Value) -> Result<(), ValidationError> {
    if value.is_object() {
        Ok(())
    } else {
        let mut err = ValidationError::new("metadata");
        err.message = Some("Metadata must be a JSON object".into());
        Err(err)
    }
}
