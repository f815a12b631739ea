//! Content block entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the content_blocks table.
#[derive(Debug, Clone, FromRow)]
pub struct ContentBlockEntity {
    pub id: Uuid,
    pub section: String,
    pub key: String,
    pub title: Option<String>,
    pub body: String,
    pub media_url: Option<String>,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ContentBlockEntity> for domain::models::ContentBlock {
    fn from(entity: ContentBlockEntity) -> Self {
        Self {
            id: entity.id,
            section: entity.section,
            key: entity.key,
            title: entity.title,
            body: entity.body,
            media_url: entity.media_url,
            sort_order: entity.sort_order,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
