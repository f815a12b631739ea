//! Newsletter subscriber domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A newsletter subscriber.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Subscriber {
    pub id: Uuid,
    pub email: String,
    pub is_active: bool,
    pub source: Option<String>,
    pub subscribed_at: DateTime<Utc>,
    pub unsubscribed_at: Option<DateTime<Utc>>,
}

impl Subscriber {
    /// Sets the active flag.
    ///
    /// Returns `false` without touching any timestamp when the subscriber is
    /// already in the requested state, so repeated calls are no-ops.
    pub fn set_active(&mut self, active: bool, now: DateTime<Utc>) -> bool {
        if self.is_active == active {
            return false;
        }
        self.is_active = active;
        if active {
            self.subscribed_at = now;
            self.unsubscribed_at = None;
        } else {
            self.unsubscribed_at = Some(now);
        }
        true
    }
}

/// Public newsletter signup (`POST /api/newsletter`).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct NewsletterRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(max = 50, message = "Source must be at most 50 characters"))]
    pub source: Option<String>,
}

impl NewsletterRequest {
    pub fn normalized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }
}

/// Outcome of a newsletter signup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeOutcome {
    Created,
    Reactivated,
    AlreadyActive,
}

/// Admin request to toggle a subscriber.
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct SetActiveRequest {
    pub active: bool,
}

/// Filter for listing subscribers.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct SubscriberFilter {
    pub active: Option<bool>,
}

impl SubscriberFilter {
    pub fn matches(&self, subscriber: &Subscriber) -> bool {
        self.active.map_or(true, |a| subscriber.is_active == a)
    }
}
