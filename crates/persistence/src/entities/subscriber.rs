//! Newsletter subscriber entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the newsletter_subscribers table.
#[derive(Debug, Clone, FromRow)]
pub struct SubscriberEntity {
    pub id: Uuid,
    pub email: String,
    pub is_active: bool,
    pub source: Option<String>,
    pub subscribed_at: DateTime<Utc>,
    pub unsubscribed_at: Option<DateTime<Utc>>,
}

impl From<SubscriberEntity> for domain::models::Subscriber {
    fn from(entity: SubscriberEntity) -> Self {
        Self {
            id: entity.id,
            email: entity.email,
            is_active: entity.is_active,
            source: entity.source,
            subscribed_at: entity.subscribed_at,
            unsubscribed_at: entity.unsubscribed_at,
        }
    }
}
