//! Intake (lead) domain models.
//!
//! Intakes are submitted from the public contact form and worked through a
//! small status workflow in the admin dashboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Workflow status of an intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntakeStatus {
    #[default]
    New,
    Contacted,
    Scheduled,
    Completed,
    Declined,
}

impl IntakeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntakeStatus::New => "new",
            IntakeStatus::Contacted => "contacted",
            IntakeStatus::Scheduled => "scheduled",
            IntakeStatus::Completed => "completed",
            IntakeStatus::Declined => "declined",
        }
    }

    /// Completed and declined intakes cannot move anywhere else.
    pub fn is_terminal(&self) -> bool {
        matches!(self, IntakeStatus::Completed | IntakeStatus::Declined)
    }

    /// Whether the workflow allows moving from `self` to `next`.
    ///
    /// Staying in the same status is always allowed and treated as a no-op.
    pub fn can_transition_to(&self, next: IntakeStatus) -> bool {
        use IntakeStatus::*;

        if *self == next {
            return true;
        }
        match (self, next) {
            (New, Contacted) | (Contacted, Scheduled) | (Scheduled, Completed) => true,
            (from, Declined) => !from.is_terminal(),
            _ => false,
        }
    }
}

impl std::fmt::Display for IntakeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for IntakeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(IntakeStatus::New),
            "contacted" => Ok(IntakeStatus::Contacted),
            "scheduled" => Ok(IntakeStatus::Scheduled),
            "completed" => Ok(IntakeStatus::Completed),
            "declined" => Ok(IntakeStatus::Declined),
            other => Err(format!("Unknown intake status: {}", other)),
        }
    }
}

/// A lead submitted through the contact form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Intake {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub service: Option<String>,
    pub message: String,
    pub status: IntakeStatus,
    pub notes: Option<String>,
    /// Salted hash of the submitter's IP; never the raw address.
    pub ip_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public contact form submission (`POST /api/intake`).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct IntakeRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(max = 30, message = "Phone must be at most 30 characters"))]
    pub phone: Option<String>,

    #[validate(length(max = 100, message = "Company must be at most 100 characters"))]
    pub company: Option<String>,

    #[validate(length(max = 100, message = "Service must be at most 100 characters"))]
    pub service: Option<String>,

    #[validate(length(min = 1, max = 5000, message = "Message must be 1-5000 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub message: String,
}

/// Values for a new intake row.
#[derive(Debug, Clone, PartialEq)]
pub struct NewIntake {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub service: Option<String>,
    pub message: String,
    pub ip_hash: Option<String>,
}

impl IntakeRequest {
    /// Trims free-text fields and lowercases the email.
    pub fn into_new_intake(self, ip_hash: Option<String>) -> NewIntake {
        NewIntake {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            phone: non_empty(self.phone),
            company: non_empty(self.company),
            service: non_empty(self.service),
            message: self.message.trim().to_string(),
            ip_hash,
        }
    }
}

/// Admin update of an intake's workflow status or notes.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateIntakeRequest {
    pub status: Option<IntakeStatus>,

    #[validate(length(max = 5000, message = "Notes must be at most 5000 characters"))]
    pub notes: Option<String>,
}

/// Raised when an update asks for a transition the workflow forbids.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Cannot move intake from {from} to {to}")]
pub struct InvalidTransition {
    pub from: IntakeStatus,
    pub to: IntakeStatus,
}

impl UpdateIntakeRequest {
    /// Applies the update, rejecting transitions the workflow does not allow.
    /// The intake is left untouched on error.
    pub fn apply_to(self, intake: &mut Intake, now: DateTime<Utc>) -> Result<(), InvalidTransition> {
        if let Some(next) = self.status {
            if !intake.status.can_transition_to(next) {
                return Err(InvalidTransition {
                    from: intake.status,
                    to: next,
                });
            }
            intake.status = next;
        }
        if let Some(notes) = self.notes {
            intake.notes = Some(notes);
        }
        intake.updated_at = now;
        Ok(())
    }
}

/// Filter for listing intakes.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct IntakeFilter {
    pub status: Option<IntakeStatus>,
}

impl IntakeFilter {
    pub fn matches(&self, intake: &Intake) -> bool {
        self.status.map_or(true, |s| intake.status == s)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
