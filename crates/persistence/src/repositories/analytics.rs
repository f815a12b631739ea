//! Analytics event repository. Insert only; reporting happens in the store's dashboard.

use domain::models::NewAnalyticsEvent;
use sqlx::PgPool;

use crate::metrics::QueryTimer;

#[derive(Clone)]
pub struct AnalyticsRepository {
    pool: PgPool,
}

impl AnalyticsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, event: NewAnalyticsEvent) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("insert_analytics_event");
        sqlx::query(
            r#"
            INSERT INTO analytics_events (event_type, path, referrer, user_agent, session_id, metadata, ip_hash)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(event.event_type)
        .bind(event.path)
        .bind(event.referrer)
        .bind(event.user_agent)
        .bind(event.session_id)
        .bind(event.metadata)
        .bind(event.ip_hash)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(())
    }
}
