//! Intake repository for database operations.

use domain::models::{Intake, IntakeFilter, NewIntake};
use shared::pagination::PageParams;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::IntakeEntity;
use crate::metrics::QueryTimer;

const COLUMNS: &str = "id, name, email, phone, company, service, message, status, notes, \
                       ip_hash, created_at, updated_at";

/// Repository for intake database operations.
#[derive(Clone)]
pub struct IntakeRepository {
    pool: PgPool,
}

impl IntakeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, intake: NewIntake) -> Result<IntakeEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_intake");
        let result = sqlx::query_as::<_, IntakeEntity>(&format!(
            r#"
            INSERT INTO intakes (name, email, phone, company, service, message, ip_hash)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(intake.name)
        .bind(intake.email)
        .bind(intake.phone)
        .bind(intake.company)
        .bind(intake.service)
        .bind(intake.message)
        .bind(intake.ip_hash)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<IntakeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_intake_by_id");
        let result = sqlx::query_as::<_, IntakeEntity>(&format!(
            "SELECT {COLUMNS} FROM intakes WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Lists intakes newest first.
    pub async fn list(
        &self,
        filter: IntakeFilter,
        page: PageParams,
    ) -> Result<(Vec<IntakeEntity>, i64), sqlx::Error> {
        let status = filter.status.map(|s| s.as_str());

        let timer = QueryTimer::new("list_intakes");
        let rows = sqlx::query_as::<_, IntakeEntity>(&format!(
            r#"
            SELECT {COLUMNS} FROM intakes
            WHERE ($1::text IS NULL OR status = $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(status)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM intakes WHERE ($1::text IS NULL OR status = $1)")
                .bind(status)
                .fetch_one(&self.pool)
                .await?;
        timer.record();

        Ok((rows, total))
    }

    /// Updates the workflow fields. Contact details are immutable after submission.
    pub async fn update_workflow(&self, intake: &Intake) -> Result<Option<IntakeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_intake_workflow");
        let result = sqlx::query_as::<_, IntakeEntity>(&format!(
            r#"
            UPDATE intakes
            SET status = $2, notes = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(intake.id)
        .bind(intake.status.as_str())
        .bind(&intake.notes)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_intake");
        let result = sqlx::query("DELETE FROM intakes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
