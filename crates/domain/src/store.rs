//! Store traits for the external data store.
//!
//! The persistence crate implements these against Postgres and in memory.
//! Handlers only ever see `Arc<dyn Store>`.

use async_trait::async_trait;
use shared::pagination::{Page, PageParams};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    BlogPost, BlogPostFilter, ContentBlock, ContentBlockFilter, Event, EventFilter, GalleryAsset,
    GalleryFilter, Intake, IntakeFilter, NewAnalyticsEvent, NewBlogPost, NewIntake, SeoSettings,
    Subscriber, SubscriberFilter, ThemeSettings,
};

/// Errors returned by store implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Record not found")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Store error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait IntakeStore: Send + Sync {
    async fn create_intake(&self, intake: NewIntake) -> StoreResult<Intake>;
    async fn get_intake(&self, id: Uuid) -> StoreResult<Intake>;
    async fn list_intakes(&self, filter: IntakeFilter, page: PageParams) -> StoreResult<Page<Intake>>;
    /// Persists status and notes of an existing intake.
    async fn save_intake(&self, intake: &Intake) -> StoreResult<Intake>;
    async fn delete_intake(&self, id: Uuid) -> StoreResult<()>;
}

#[async_trait]
pub trait SubscriberStore: Send + Sync {
    /// Lookup by lowercased email.
    async fn find_subscriber_by_email(&self, email: &str) -> StoreResult<Option<Subscriber>>;
    /// Fails with `Conflict` when the email is already present.
    async fn create_subscriber(&self, email: &str, source: Option<&str>) -> StoreResult<Subscriber>;
    async fn get_subscriber(&self, id: Uuid) -> StoreResult<Subscriber>;
    async fn list_subscribers(
        &self,
        filter: SubscriberFilter,
        page: PageParams,
    ) -> StoreResult<Page<Subscriber>>;
    /// Persists the active flag and its timestamps.
    async fn save_subscriber(&self, subscriber: &Subscriber) -> StoreResult<Subscriber>;
    async fn delete_subscriber(&self, id: Uuid) -> StoreResult<()>;
}

#[async_trait]
pub trait AnalyticsStore: Send + Sync {
    async fn record_event(&self, event: NewAnalyticsEvent) -> StoreResult<()>;
}

/// Blog posts, events, gallery assets and editable site copy.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Fails with `Conflict` when the slug is taken.
    async fn create_post(&self, post: NewBlogPost) -> StoreResult<BlogPost>;
    async fn get_post(&self, id: Uuid) -> StoreResult<BlogPost>;
    async fn get_post_by_slug(&self, slug: &str) -> StoreResult<BlogPost>;
    /// Newest first.
    async fn list_posts(&self, filter: BlogPostFilter, page: PageParams) -> StoreResult<Page<BlogPost>>;
    async fn save_post(&self, post: &BlogPost) -> StoreResult<BlogPost>;
    async fn delete_post(&self, id: Uuid) -> StoreResult<()>;

    async fn insert_event(&self, event: &Event) -> StoreResult<Event>;
    async fn get_event(&self, id: Uuid) -> StoreResult<Event>;
    /// Ordered by event date, soonest first.
    async fn list_events(&self, filter: EventFilter, page: PageParams) -> StoreResult<Page<Event>>;
    async fn save_event(&self, event: &Event) -> StoreResult<Event>;
    async fn delete_event(&self, id: Uuid) -> StoreResult<()>;

    async fn insert_asset(&self, asset: &GalleryAsset) -> StoreResult<GalleryAsset>;
    async fn get_asset(&self, id: Uuid) -> StoreResult<GalleryAsset>;
    /// Ordered by `sort_order`, then newest first.
    async fn list_assets(
        &self,
        filter: GalleryFilter,
        page: PageParams,
    ) -> StoreResult<Page<GalleryAsset>>;
    async fn save_asset(&self, asset: &GalleryAsset) -> StoreResult<GalleryAsset>;
    async fn delete_asset(&self, id: Uuid) -> StoreResult<()>;

    /// Fails with `Conflict` when `(section, key)` is taken.
    async fn insert_block(&self, block: &ContentBlock) -> StoreResult<ContentBlock>;
    async fn get_block(&self, id: Uuid) -> StoreResult<ContentBlock>;
    async fn get_block_by_key(&self, section: &str, key: &str) -> StoreResult<ContentBlock>;
    /// Ordered by section, then `sort_order`, then key.
    async fn list_blocks(
        &self,
        filter: ContentBlockFilter,
        page: PageParams,
    ) -> StoreResult<Page<ContentBlock>>;
    async fn save_block(&self, block: &ContentBlock) -> StoreResult<ContentBlock>;
    async fn delete_block(&self, id: Uuid) -> StoreResult<()>;
}

/// Single-row site settings. Reads fall back to defaults when no row exists.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get_theme(&self) -> StoreResult<ThemeSettings>;
    async fn save_theme(&self, theme: &ThemeSettings) -> StoreResult<ThemeSettings>;
    async fn get_seo(&self) -> StoreResult<SeoSettings>;
    async fn save_seo(&self, seo: &SeoSettings) -> StoreResult<SeoSettings>;
}

#[async_trait]
pub trait StoreHealth: Send + Sync {
    fn backend_name(&self) -> &'static str;
    async fn ping(&self) -> StoreResult<()>;
}

/// Everything the API needs from the external store.
pub trait Store:
    IntakeStore + SubscriberStore + AnalyticsStore + ContentStore + SettingsStore + StoreHealth
{
}

impl<T> Store for T where
    T: IntakeStore + SubscriberStore + AnalyticsStore + ContentStore + SettingsStore + StoreHealth
{
}
