//! Gallery asset repository for database operations.

use domain::models::{GalleryAsset, GalleryFilter};
use shared::pagination::PageParams;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::GalleryAssetEntity;
use crate::metrics::QueryTimer;

const COLUMNS: &str = "id, title, url, category, asset_type, alt_text, sort_order, created_at";

/// Repository for gallery asset database operations.
#[derive(Clone)]
pub struct GalleryAssetRepository {
    pool: PgPool,
}

impl GalleryAssetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, asset: &GalleryAsset) -> Result<GalleryAssetEntity, sqlx::Error> {
        let timer = QueryTimer::new("insert_gallery_asset");
        let result = sqlx::query_as::<_, GalleryAssetEntity>(&format!(
            r#"
            INSERT INTO gallery_assets (id, title, url, category, asset_type, alt_text, sort_order, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(asset.id)
        .bind(&asset.title)
        .bind(&asset.url)
        .bind(&asset.category)
        .bind(asset.asset_type.as_str())
        .bind(&asset.alt_text)
        .bind(asset.sort_order)
        .bind(asset.created_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<GalleryAssetEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_gallery_asset_by_id");
        let result = sqlx::query_as::<_, GalleryAssetEntity>(&format!(
            "SELECT {COLUMNS} FROM gallery_assets WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn list(
        &self,
        filter: &GalleryFilter,
        page: PageParams,
    ) -> Result<(Vec<GalleryAssetEntity>, i64), sqlx::Error> {
        let asset_type = filter.asset_type.map(|t| t.as_str());

        let timer = QueryTimer::new("list_gallery_assets");
        let rows = sqlx::query_as::<_, GalleryAssetEntity>(&format!(
            r#"
            SELECT {COLUMNS} FROM gallery_assets
            WHERE ($1::text IS NULL OR category = $1)
              AND ($2::text IS NULL OR asset_type = $2)
            ORDER BY sort_order ASC, created_at DESC
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(filter.category.as_deref())
        .bind(asset_type)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM gallery_assets
            WHERE ($1::text IS NULL OR category = $1)
              AND ($2::text IS NULL OR asset_type = $2)
            "#,
        )
        .bind(filter.category.as_deref())
        .bind(asset_type)
        .fetch_one(&self.pool)
        .await?;
        timer.record();

        Ok((rows, total))
    }

    pub async fn update(&self, asset: &GalleryAsset) -> Result<Option<GalleryAssetEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_gallery_asset");
        let result = sqlx::query_as::<_, GalleryAssetEntity>(&format!(
            r#"
            UPDATE gallery_assets
            SET title = $2, url = $3, category = $4, asset_type = $5, alt_text = $6, sort_order = $7
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(asset.id)
        .bind(&asset.title)
        .bind(&asset.url)
        .bind(&asset.category)
        .bind(asset.asset_type.as_str())
        .bind(&asset.alt_text)
        .bind(asset.sort_order)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_gallery_asset");
        let result = sqlx::query("DELETE FROM gallery_assets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
