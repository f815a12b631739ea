//! Postgres-backed implementation of the domain store traits.

use async_trait::async_trait;
use domain::models::{
    BlogPost, BlogPostFilter, ContentBlock, ContentBlockFilter, Event, EventFilter, GalleryAsset,
    GalleryFilter, Intake, IntakeFilter, NewAnalyticsEvent, NewBlogPost, NewIntake, SeoSettings,
    Subscriber, SubscriberFilter, ThemeSettings,
};
use domain::store::{
    AnalyticsStore, ContentStore, IntakeStore, SettingsStore, StoreError, StoreHealth,
    StoreResult, SubscriberStore,
};
use shared::pagination::{Page, PageParams};
use sqlx::PgPool;
use uuid::Uuid;

use crate::repositories::{
    AnalyticsRepository, BlogPostRepository, ContentBlockRepository, EventRepository, GalleryAssetRepository,
    IntakeRepository, SettingsRepository, SubscriberRepository,
};

/// Maps sqlx errors onto store errors. Unique violations become conflicts.
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::RowNotFound => StoreError::NotFound,
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            let detail = db_err
                .constraint()
                .map(|c| format!("Duplicate value violates {}", c))
                .unwrap_or_else(|| "Resource already exists".to_string());
            StoreError::Conflict(detail)
        }
        _ => {
            tracing::error!(error = %err, "Database error");
            StoreError::Backend(err.to_string())
        }
    }
}

fn found<E, T: From<E>>(row: Option<E>) -> StoreResult<T> {
    row.map(Into::into).ok_or(StoreError::NotFound)
}

fn deleted(rows: u64) -> StoreResult<()> {
    if rows == 0 {
        Err(StoreError::NotFound)
    } else {
        Ok(())
    }
}

fn page<E, T: From<E>>((rows, total): (Vec<E>, i64), params: PageParams) -> Page<T> {
    Page::new(rows.into_iter().map(Into::into).collect(), total, params)
}

/// Store backed by the external Postgres database.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    posts: BlogPostRepository,
    events: EventRepository,
    gallery: GalleryAssetRepository,
    blocks: ContentBlockRepository,
    intakes: IntakeRepository,
    subscribers: SubscriberRepository,
    analytics: AnalyticsRepository,
    settings: SettingsRepository,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            posts: BlogPostRepository::new(pool.clone()),
            events: EventRepository::new(pool.clone()),
            gallery: GalleryAssetRepository::new(pool.clone()),
            blocks: ContentBlockRepository::new(pool.clone()),
            intakes: IntakeRepository::new(pool.clone()),
            subscribers: SubscriberRepository::new(pool.clone()),
            analytics: AnalyticsRepository::new(pool.clone()),
            settings: SettingsRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl IntakeStore for PgStore {
    async fn create_intake(&self, intake: NewIntake) -> StoreResult<Intake> {
        self.intakes
            .create(intake)
            .await
            .map(Into::into)
            .map_err(map_sqlx_error)
    }

    async fn get_intake(&self, id: Uuid) -> StoreResult<Intake> {
        found(self.intakes.find_by_id(id).await.map_err(map_sqlx_error)?)
    }

    async fn list_intakes(&self, filter: IntakeFilter, params: PageParams) -> StoreResult<Page<Intake>> {
        let rows = self.intakes.list(filter, params).await.map_err(map_sqlx_error)?;
        Ok(page(rows, params))
    }

    async fn save_intake(&self, intake: &Intake) -> StoreResult<Intake> {
        found(self.intakes.update_workflow(intake).await.map_err(map_sqlx_error)?)
    }

    async fn delete_intake(&self, id: Uuid) -> StoreResult<()> {
        deleted(self.intakes.delete(id).await.map_err(map_sqlx_error)?)
    }
}

#[async_trait]
impl SubscriberStore for PgStore {
    async fn find_subscriber_by_email(&self, email: &str) -> StoreResult<Option<Subscriber>> {
        Ok(self
            .subscribers
            .find_by_email(email)
            .await
            .map_err(map_sqlx_error)?
            .map(Into::into))
    }

    async fn create_subscriber(&self, email: &str, source: Option<&str>) -> StoreResult<Subscriber> {
        self.subscribers
            .create(email, source)
            .await
            .map(Into::into)
            .map_err(map_sqlx_error)
    }

    async fn get_subscriber(&self, id: Uuid) -> StoreResult<Subscriber> {
        found(self.subscribers.find_by_id(id).await.map_err(map_sqlx_error)?)
    }

    async fn list_subscribers(
        &self,
        filter: SubscriberFilter,
        params: PageParams,
    ) -> StoreResult<Page<Subscriber>> {
        let rows = self.subscribers.list(filter, params).await.map_err(map_sqlx_error)?;
        Ok(page(rows, params))
    }

    async fn save_subscriber(&self, subscriber: &Subscriber) -> StoreResult<Subscriber> {
        found(
            self.subscribers
                .update_status(subscriber)
                .await
                .map_err(map_sqlx_error)?,
        )
    }

    async fn delete_subscriber(&self, id: Uuid) -> StoreResult<()> {
        deleted(self.subscribers.delete(id).await.map_err(map_sqlx_error)?)
    }
}

#[async_trait]
impl AnalyticsStore for PgStore {
    async fn record_event(&self, event: NewAnalyticsEvent) -> StoreResult<()> {
        self.analytics.insert(event).await.map_err(map_sqlx_error)
    }
}

#[async_trait]
impl ContentStore for PgStore {
    async fn create_post(&self, post: NewBlogPost) -> StoreResult<BlogPost> {
        self.posts
            .create(post)
            .await
            .map(Into::into)
            .map_err(map_sqlx_error)
    }

    async fn get_post(&self, id: Uuid) -> StoreResult<BlogPost> {
        found(self.posts.find_by_id(id).await.map_err(map_sqlx_error)?)
    }

    async fn get_post_by_slug(&self, slug: &str) -> StoreResult<BlogPost> {
        found(self.posts.find_by_slug(slug).await.map_err(map_sqlx_error)?)
    }

    async fn list_posts(&self, filter: BlogPostFilter, params: PageParams) -> StoreResult<Page<BlogPost>> {
        let rows = self.posts.list(&filter, params).await.map_err(map_sqlx_error)?;
        Ok(page(rows, params))
    }

    async fn save_post(&self, post: &BlogPost) -> StoreResult<BlogPost> {
        found(self.posts.update(post).await.map_err(map_sqlx_error)?)
    }

    async fn delete_post(&self, id: Uuid) -> StoreResult<()> {
        deleted(self.posts.delete(id).await.map_err(map_sqlx_error)?)
    }

    async fn insert_event(&self, event: &Event) -> StoreResult<Event> {
        self.events
            .insert(event)
            .await
            .map(Into::into)
            .map_err(map_sqlx_error)
    }

    async fn get_event(&self, id: Uuid) -> StoreResult<Event> {
        found(self.events.find_by_id(id).await.map_err(map_sqlx_error)?)
    }

    async fn list_events(&self, filter: EventFilter, params: PageParams) -> StoreResult<Page<Event>> {
        let rows = self.events.list(filter, params).await.map_err(map_sqlx_error)?;
        Ok(page(rows, params))
    }

    async fn save_event(&self, event: &Event) -> StoreResult<Event> {
        found(self.events.update(event).await.map_err(map_sqlx_error)?)
    }

    async fn delete_event(&self, id: Uuid) -> StoreResult<()> {
        deleted(self.events.delete(id).await.map_err(map_sqlx_error)?)
    }

    async fn insert_asset(&self, asset: &GalleryAsset) -> StoreResult<GalleryAsset> {
        self.gallery
            .insert(asset)
            .await
            .map(Into::into)
            .map_err(map_sqlx_error)
    }

    async fn get_asset(&self, id: Uuid) -> StoreResult<GalleryAsset> {
        found(self.gallery.find_by_id(id).await.map_err(map_sqlx_error)?)
    }

    async fn list_assets(
        &self,
        filter: GalleryFilter,
        params: PageParams,
    ) -> StoreResult<Page<GalleryAsset>> {
        let rows = self.gallery.list(&filter, params).await.map_err(map_sqlx_error)?;
        Ok(page(rows, params))
    }

    async fn save_asset(&self, asset: &GalleryAsset) -> StoreResult<GalleryAsset> {
        found(self.gallery.update(asset).await.map_err(map_sqlx_error)?)
    }

    async fn delete_asset(&self, id: Uuid) -> StoreResult<()> {
        deleted(self.gallery.delete(id).await.map_err(map_sqlx_error)?)
    }

    async fn insert_block(&self, block: &ContentBlock) -> StoreResult<ContentBlock> {
        self.blocks
            .insert(block)
            .await
            .map(Into::into)
            .map_err(map_sqlx_error)
    }

    async fn get_block(&self, id: Uuid) -> StoreResult<ContentBlock> {
        found(self.blocks.find_by_id(id).await.map_err(map_sqlx_error)?)
    }

    async fn get_block_by_key(&self, section: &str, key: &str) -> StoreResult<ContentBlock> {
        found(self.blocks.find_by_key(section, key).await.map_err(map_sqlx_error)?)
    }

    async fn list_blocks(
        &self,
        filter: ContentBlockFilter,
        params: PageParams,
    ) -> StoreResult<Page<ContentBlock>> {
        let rows = self.blocks.list(&filter, params).await.map_err(map_sqlx_error)?;
        Ok(page(rows, params))
    }

    async fn save_block(&self, block: &ContentBlock) -> StoreResult<ContentBlock> {
        found(self.blocks.update(block).await.map_err(map_sqlx_error)?)
    }

    async fn delete_block(&self, id: Uuid) -> StoreResult<()> {
        deleted(self.blocks.delete(id).await.map_err(map_sqlx_error)?)
    }
}

#[async_trait]
impl SettingsStore for PgStore {
    async fn get_theme(&self) -> StoreResult<ThemeSettings> {
        Ok(self
            .settings
            .get_theme()
            .await
            .map_err(map_sqlx_error)?
            .map(Into::into)
            .unwrap_or_default())
    }

    async fn save_theme(&self, theme: &ThemeSettings) -> StoreResult<ThemeSettings> {
        self.settings
            .upsert_theme(theme)
            .await
            .map(Into::into)
            .map_err(map_sqlx_error)
    }

    async fn get_seo(&self) -> StoreResult<SeoSettings> {
        Ok(self
            .settings
            .get_seo()
            .await
            .map_err(map_sqlx_error)?
            .map(Into::into)
            .unwrap_or_default())
    }

    async fn save_seo(&self, seo: &SeoSettings) -> StoreResult<SeoSettings> {
        self.settings
            .upsert_seo(seo)
            .await
            .map(Into::into)
            .map_err(map_sqlx_error)
    }
}

#[async_trait]
impl StoreHealth for PgStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> StoreResult<()> {
        crate::metrics::record_pool_metrics(&self.pool);
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(map_sqlx_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        assert_eq!(map_sqlx_error(sqlx::Error::RowNotFound), StoreError::NotFound);
    }

    #[test]
    fn test_other_errors_map_to_backend() {
        let err = map_sqlx_error(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, StoreError::Backend(_)));
    }

    #[test]
    fn test_deleted() {
        assert_eq!(deleted(0), Err(StoreError::NotFound));
        assert_eq!(deleted(1), Ok(()));
    }
}
