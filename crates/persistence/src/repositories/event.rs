//! Event repository for database operations.

use domain::models::{Event, EventFilter};
use shared::pagination::PageParams;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::EventEntity;
use crate::metrics::QueryTimer;

const COLUMNS: &str = "id, title, description, location, event_date, ticket_url, image_url, \
                       is_upcoming, is_featured, created_at, updated_at";

/// Repository for event database operations.
#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, event: &Event) -> Result<EventEntity, sqlx::Error> {
        let timer = QueryTimer::new("insert_event");
        let result = sqlx::query_as::<_, EventEntity>(&format!(
            r#"
            INSERT INTO events (id, title, description, location, event_date, ticket_url,
                                image_url, is_upcoming, is_featured, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(event.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.location)
        .bind(event.event_date)
        .bind(&event.ticket_url)
        .bind(&event.image_url)
        .bind(event.is_upcoming)
        .bind(event.is_featured)
        .bind(event.created_at)
        .bind(event.updated_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_event_by_id");
        let result = sqlx::query_as::<_, EventEntity>(&format!(
            "SELECT {COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn list(
        &self,
        filter: EventFilter,
        page: PageParams,
    ) -> Result<(Vec<EventEntity>, i64), sqlx::Error> {
        let timer = QueryTimer::new("list_events");
        let rows = sqlx::query_as::<_, EventEntity>(&format!(
            r#"
            SELECT {COLUMNS} FROM events
            WHERE ($1::boolean IS NULL OR is_upcoming = $1)
              AND ($2::boolean IS NULL OR is_featured = $2)
            ORDER BY event_date ASC
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(filter.upcoming)
        .bind(filter.featured)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM events
            WHERE ($1::boolean IS NULL OR is_upcoming = $1)
              AND ($2::boolean IS NULL OR is_featured = $2)
            "#,
        )
        .bind(filter.upcoming)
        .bind(filter.featured)
        .fetch_one(&self.pool)
        .await?;
        timer.record();

        Ok((rows, total))
    }

    pub async fn update(&self, event: &Event) -> Result<Option<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_event");
        let result = sqlx::query_as::<_, EventEntity>(&format!(
            r#"
            UPDATE events
            SET title = $2, description = $3, location = $4, event_date = $5, ticket_url = $6,
                image_url = $7, is_upcoming = $8, is_featured = $9, updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(event.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.location)
        .bind(event.event_date)
        .bind(&event.ticket_url)
        .bind(&event.image_url)
        .bind(event.is_upcoming)
        .bind(event.is_featured)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_event");
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
