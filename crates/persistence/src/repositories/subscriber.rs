//! Newsletter subscriber repository for database operations.

use domain::models::{Subscriber, SubscriberFilter};
use shared::pagination::PageParams;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::SubscriberEntity;
use crate::metrics::QueryTimer;

const COLUMNS: &str = "id, email, is_active, source, subscribed_at, unsubscribed_at";

/// Repository for newsletter subscriber database operations.
#[derive(Clone)]
pub struct SubscriberRepository {
    pool: PgPool,
}

impl SubscriberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<SubscriberEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_subscriber_by_email");
        let result = sqlx::query_as::<_, SubscriberEntity>(&format!(
            "SELECT {COLUMNS} FROM newsletter_subscribers WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<SubscriberEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_subscriber_by_id");
        let result = sqlx::query_as::<_, SubscriberEntity>(&format!(
            "SELECT {COLUMNS} FROM newsletter_subscribers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Inserts an active subscriber. The unique index on email surfaces duplicates as 23505.
    pub async fn create(
        &self,
        email: &str,
        source: Option<&str>,
    ) -> Result<SubscriberEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_subscriber");
        let result = sqlx::query_as::<_, SubscriberEntity>(&format!(
            r#"
            INSERT INTO newsletter_subscribers (email, source, is_active)
            VALUES ($1, $2, TRUE)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(email)
        .bind(source)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn list(
        &self,
        filter: SubscriberFilter,
        page: PageParams,
    ) -> Result<(Vec<SubscriberEntity>, i64), sqlx::Error> {
        let timer = QueryTimer::new("list_subscribers");
        let rows = sqlx::query_as::<_, SubscriberEntity>(&format!(
            r#"
            SELECT {COLUMNS} FROM newsletter_subscribers
            WHERE ($1::boolean IS NULL OR is_active = $1)
            ORDER BY subscribed_at DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(filter.active)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM newsletter_subscribers WHERE ($1::boolean IS NULL OR is_active = $1)",
        )
        .bind(filter.active)
        .fetch_one(&self.pool)
        .await?;
        timer.record();

        Ok((rows, total))
    }

    pub async fn update_status(
        &self,
        subscriber: &Subscriber,
    ) -> Result<Option<SubscriberEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_subscriber_status");
        let result = sqlx::query_as::<_, SubscriberEntity>(&format!(
            r#"
            UPDATE newsletter_subscribers
            SET is_active = $2, subscribed_at = $3, unsubscribed_at = $4
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(subscriber.id)
        .bind(subscriber.is_active)
        .bind(subscriber.subscribed_at)
        .bind(subscriber.unsubscribed_at)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_subscriber");
        let result = sqlx::query("DELETE FROM newsletter_subscribers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
