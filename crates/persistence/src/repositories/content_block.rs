//! Content block repository for database operations.

use domain::models::{ContentBlock, ContentBlockFilter};
use shared::pagination::PageParams;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::ContentBlockEntity;
use crate::metrics::QueryTimer;

const COLUMNS: &str = "id, section, key, title, body, media_url, sort_order, created_at, updated_at";

/// Repository for content block database operations.
#[derive(Clone)]
pub struct ContentBlockRepository {
    pool: PgPool,
}

impl ContentBlockRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Unique violation on `(section, key)` when the address is taken.
    pub async fn insert(&self, block: &ContentBlock) -> Result<ContentBlockEntity, sqlx::Error> {
        let timer = QueryTimer::new("insert_content_block");
        let result = sqlx::query_as::<_, ContentBlockEntity>(&format!(
            r#"
            INSERT INTO content_blocks (id, section, key, title, body, media_url, sort_order,
                                        created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(block.id)
        .bind(&block.section)
        .bind(&block.key)
        .bind(&block.title)
        .bind(&block.body)
        .bind(&block.media_url)
        .bind(block.sort_order)
        .bind(block.created_at)
        .bind(block.updated_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ContentBlockEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_content_block_by_id");
        let result = sqlx::query_as::<_, ContentBlockEntity>(&format!(
            "SELECT {COLUMNS} FROM content_blocks WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_key(
        &self,
        section: &str,
        key: &str,
    ) -> Result<Option<ContentBlockEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_content_block_by_key");
        let result = sqlx::query_as::<_, ContentBlockEntity>(&format!(
            "SELECT {COLUMNS} FROM content_blocks WHERE section = $1 AND key = $2"
        ))
        .bind(section)
        .bind(key)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn list(
        &self,
        filter: &ContentBlockFilter,
        page: PageParams,
    ) -> Result<(Vec<ContentBlockEntity>, i64), sqlx::Error> {
        let timer = QueryTimer::new("list_content_blocks");
        let rows = sqlx::query_as::<_, ContentBlockEntity>(&format!(
            r#"
            SELECT {COLUMNS} FROM content_blocks
            WHERE ($1::text IS NULL OR section = $1)
            ORDER BY section ASC, sort_order ASC, key ASC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(&filter.section)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM content_blocks WHERE ($1::text IS NULL OR section = $1)",
        )
        .bind(&filter.section)
        .fetch_one(&self.pool)
        .await?;
        timer.record();

        Ok((rows, total))
    }

    pub async fn update(
        &self,
        block: &ContentBlock,
    ) -> Result<Option<ContentBlockEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_content_block");
        let result = sqlx::query_as::<_, ContentBlockEntity>(&format!(
            r#"
            UPDATE content_blocks
            SET title = $2, body = $3, media_url = $4, sort_order = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(block.id)
        .bind(&block.title)
        .bind(&block.body)
        .bind(&block.media_url)
        .bind(block.sort_order)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_content_block");
        let result = sqlx::query("DELETE FROM content_blocks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
