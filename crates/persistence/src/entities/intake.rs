//! Intake entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Intake, IntakeStatus};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the intakes table.
#[derive(Debug, Clone, FromRow)]
pub struct IntakeEntity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub service: Option<String>,
    pub message: String,
    pub status: String,
    pub notes: Option<String>,
    pub ip_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<IntakeEntity> for Intake {
    fn from(entity: IntakeEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            email: entity.email,
            phone: entity.phone,
            company: entity.company,
            service: entity.service,
            message: entity.message,
            status: entity.status.parse::<IntakeStatus>().unwrap_or_default(),
            notes: entity.notes,
            ip_hash: entity.ip_hash,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
