//! In-process store used by tests and local development.
//!
//! Mirrors the Postgres constraints that matter to callers: unique post slugs,
//! unique subscriber emails, unique content block addresses, and default
//! single-row settings.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use domain::models::{
    AnalyticsEvent, BlogPost, BlogPostFilter, ContentBlock, ContentBlockFilter, Event,
    EventFilter, GalleryAsset, GalleryFilter, Intake, IntakeFilter, IntakeStatus,
    NewAnalyticsEvent, NewBlogPost, NewIntake, SeoSettings, Subscriber, SubscriberFilter,
    ThemeSettings,
};
use domain::store::{
    AnalyticsStore, ContentStore, IntakeStore, SettingsStore, StoreError, StoreHealth,
    StoreResult, SubscriberStore,
};
use shared::pagination::{Page, PageParams};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    posts: HashMap<Uuid, BlogPost>,
    events: HashMap<Uuid, Event>,
    assets: HashMap<Uuid, GalleryAsset>,
    blocks: HashMap<Uuid, ContentBlock>,
    intakes: HashMap<Uuid, Intake>,
    subscribers: HashMap<Uuid, Subscriber>,
    analytics: Vec<AnalyticsEvent>,
    theme: Option<ThemeSettings>,
    seo: Option<SeoSettings>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded analytics events.
    pub async fn analytics_count(&self) -> usize {
        self.tables.read().await.analytics.len()
    }

    /// Snapshot of recorded analytics events, oldest first.
    pub async fn analytics_events(&self) -> Vec<AnalyticsEvent> {
        self.tables.read().await.analytics.clone()
    }
}

fn paginate<T>(mut rows: Vec<T>, params: PageParams) -> Page<T> {
    let total = rows.len() as i64;
    rows = params.apply(rows);
    Page::new(rows, total, params)
}

fn slug_taken(tables: &Tables, slug: &str, except: Option<Uuid>) -> bool {
    tables
        .posts
        .values()
        .any(|p| p.slug == slug && Some(p.id) != except)
}

#[async_trait]
impl IntakeStore for MemoryStore {
    async fn create_intake(&self, intake: NewIntake) -> StoreResult<Intake> {
        let now = Utc::now();
        let row = Intake {
            id: Uuid::new_v4(),
            name: intake.name,
            email: intake.email,
            phone: intake.phone,
            company: intake.company,
            service: intake.service,
            message: intake.message,
            status: IntakeStatus::New,
            notes: None,
            ip_hash: intake.ip_hash,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.intakes.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_intake(&self, id: Uuid) -> StoreResult<Intake> {
        self.tables
            .read()
            .await
            .intakes
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_intakes(&self, filter: IntakeFilter, params: PageParams) -> StoreResult<Page<Intake>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Intake> = tables
            .intakes
            .values()
            .filter(|i| filter.matches(i))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(rows, params))
    }

    async fn save_intake(&self, intake: &Intake) -> StoreResult<Intake> {
        let mut tables = self.tables.write().await;
        let row = tables.intakes.get_mut(&intake.id).ok_or(StoreError::NotFound)?;
        row.status = intake.status;
        row.notes = intake.notes.clone();
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete_intake(&self, id: Uuid) -> StoreResult<()> {
        self.tables
            .write()
            .await
            .intakes
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl SubscriberStore for MemoryStore {
    async fn find_subscriber_by_email(&self, email: &str) -> StoreResult<Option<Subscriber>> {
        Ok(self
            .tables
            .read()
            .await
            .subscribers
            .values()
            .find(|s| s.email == email)
            .cloned())
    }

    async fn create_subscriber(&self, email: &str, source: Option<&str>) -> StoreResult<Subscriber> {
        let mut tables = self.tables.write().await;
        if tables.subscribers.values().any(|s| s.email == email) {
            return Err(StoreError::Conflict("Email is already subscribed".into()));
        }
        let row = Subscriber {
            id: Uuid::new_v4(),
            email: email.to_string(),
            is_active: true,
            source: source.map(str::to_string),
            subscribed_at: Utc::now(),
            unsubscribed_at: None,
        };
        tables.subscribers.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_subscriber(&self, id: Uuid) -> StoreResult<Subscriber> {
        self.tables
            .read()
            .await
            .subscribers
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_subscribers(
        &self,
        filter: SubscriberFilter,
        params: PageParams,
    ) -> StoreResult<Page<Subscriber>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Subscriber> = tables
            .subscribers
            .values()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.subscribed_at.cmp(&a.subscribed_at));
        Ok(paginate(rows, params))
    }

    async fn save_subscriber(&self, subscriber: &Subscriber) -> StoreResult<Subscriber> {
        let mut tables = self.tables.write().await;
        let row = tables
            .subscribers
            .get_mut(&subscriber.id)
            .ok_or(StoreError::NotFound)?;
        row.is_active = subscriber.is_active;
        row.subscribed_at = subscriber.subscribed_at;
        row.unsubscribed_at = subscriber.unsubscribed_at;
        Ok(row.clone())
    }

    async fn delete_subscriber(&self, id: Uuid) -> StoreResult<()> {
        self.tables
            .write()
            .await
            .subscribers
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl AnalyticsStore for MemoryStore {
    async fn record_event(&self, event: NewAnalyticsEvent) -> StoreResult<()> {
        let row = AnalyticsEvent {
            id: Uuid::new_v4(),
            event_type: event.event_type,
            path: event.path,
            referrer: event.referrer,
            user_agent: event.user_agent,
            session_id: event.session_id,
            metadata: event.metadata,
            ip_hash: event.ip_hash,
            created_at: Utc::now(),
        };
        self.tables.write().await.analytics.push(row);
        Ok(())
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn create_post(&self, post: NewBlogPost) -> StoreResult<BlogPost> {
        let mut tables = self.tables.write().await;
        if slug_taken(&tables, &post.slug, None) {
            return Err(StoreError::Conflict(format!("Slug '{}' is already in use", post.slug)));
        }
        let now = Utc::now();
        let row = BlogPost {
            id: Uuid::new_v4(),
            slug: post.slug,
            title: post.title,
            excerpt: post.excerpt,
            content: post.content,
            cover_image_url: post.cover_image_url,
            status: post.status,
            tags: post.tags,
            published_at: post.published_at,
            created_at: now,
            updated_at: now,
        };
        tables.posts.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_post(&self, id: Uuid) -> StoreResult<BlogPost> {
        self.tables
            .read()
            .await
            .posts
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn get_post_by_slug(&self, slug: &str) -> StoreResult<BlogPost> {
        self.tables
            .read()
            .await
            .posts
            .values()
            .find(|p| p.slug == slug)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_posts(&self, filter: BlogPostFilter, params: PageParams) -> StoreResult<Page<BlogPost>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<BlogPost> = tables
            .posts
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            let a_key = a.published_at.unwrap_or(a.created_at);
            let b_key = b.published_at.unwrap_or(b.created_at);
            b_key.cmp(&a_key)
        });
        Ok(paginate(rows, params))
    }

    async fn save_post(&self, post: &BlogPost) -> StoreResult<BlogPost> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&post.id) {
            return Err(StoreError::NotFound);
        }
        if slug_taken(&tables, &post.slug, Some(post.id)) {
            return Err(StoreError::Conflict(format!("Slug '{}' is already in use", post.slug)));
        }
        let mut row = post.clone();
        row.updated_at = Utc::now();
        tables.posts.insert(row.id, row.clone());
        Ok(row)
    }

    async fn delete_post(&self, id: Uuid) -> StoreResult<()> {
        self.tables
            .write()
            .await
            .posts
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn insert_event(&self, event: &Event) -> StoreResult<Event> {
        self.tables
            .write()
            .await
            .events
            .insert(event.id, event.clone());
        Ok(event.clone())
    }

    async fn get_event(&self, id: Uuid) -> StoreResult<Event> {
        self.tables
            .read()
            .await
            .events
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_events(&self, filter: EventFilter, params: PageParams) -> StoreResult<Page<Event>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Event> = tables
            .events
            .values()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.event_date.cmp(&b.event_date));
        Ok(paginate(rows, params))
    }

    async fn save_event(&self, event: &Event) -> StoreResult<Event> {
        let mut tables = self.tables.write().await;
        let row = tables.events.get_mut(&event.id).ok_or(StoreError::NotFound)?;
        *row = event.clone();
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete_event(&self, id: Uuid) -> StoreResult<()> {
        self.tables
            .write()
            .await
            .events
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn insert_asset(&self, asset: &GalleryAsset) -> StoreResult<GalleryAsset> {
        self.tables
            .write()
            .await
            .assets
            .insert(asset.id, asset.clone());
        Ok(asset.clone())
    }

    async fn get_asset(&self, id: Uuid) -> StoreResult<GalleryAsset> {
        self.tables
            .read()
            .await
            .assets
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_assets(
        &self,
        filter: GalleryFilter,
        params: PageParams,
    ) -> StoreResult<Page<GalleryAsset>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<GalleryAsset> = tables
            .assets
            .values()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(paginate(rows, params))
    }

    async fn save_asset(&self, asset: &GalleryAsset) -> StoreResult<GalleryAsset> {
        let mut tables = self.tables.write().await;
        let row = tables.assets.get_mut(&asset.id).ok_or(StoreError::NotFound)?;
        *row = asset.clone();
        Ok(row.clone())
    }

    async fn delete_asset(&self, id: Uuid) -> StoreResult<()> {
        self.tables
            .write()
            .await
            .assets
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn insert_block(&self, block: &ContentBlock) -> StoreResult<ContentBlock> {
        let mut tables = self.tables.write().await;
        if tables
            .blocks
            .values()
            .any(|b| b.section == block.section && b.key == block.key)
        {
            return Err(StoreError::Conflict(format!(
                "Content block '{}/{}' already exists",
                block.section, block.key
            )));
        }
        tables.blocks.insert(block.id, block.clone());
        Ok(block.clone())
    }

    async fn get_block(&self, id: Uuid) -> StoreResult<ContentBlock> {
        self.tables
            .read()
            .await
            .blocks
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn get_block_by_key(&self, section: &str, key: &str) -> StoreResult<ContentBlock> {
        self.tables
            .read()
            .await
            .blocks
            .values()
            .find(|b| b.section == section && b.key == key)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_blocks(
        &self,
        filter: ContentBlockFilter,
        params: PageParams,
    ) -> StoreResult<Page<ContentBlock>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<ContentBlock> = tables
            .blocks
            .values()
            .filter(|b| filter.matches(b))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            a.section
                .cmp(&b.section)
                .then_with(|| a.sort_order.cmp(&b.sort_order))
                .then_with(|| a.key.cmp(&b.key))
        });
        Ok(paginate(rows, params))
    }

    async fn save_block(&self, block: &ContentBlock) -> StoreResult<ContentBlock> {
        let mut tables = self.tables.write().await;
        let row = tables.blocks.get_mut(&block.id).ok_or(StoreError::NotFound)?;
        // Section and key are the block's address and stay as stored.
        row.title = block.title.clone();
        row.body = block.body.clone();
        row.media_url = block.media_url.clone();
        row.sort_order = block.sort_order;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete_block(&self, id: Uuid) -> StoreResult<()> {
        self.tables
            .write()
            .await
            .blocks
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn get_theme(&self) -> StoreResult<ThemeSettings> {
        Ok(self.tables.read().await.theme.clone().unwrap_or_default())
    }

    async fn save_theme(&self, theme: &ThemeSettings) -> StoreResult<ThemeSettings> {
        let mut row = theme.clone();
        row.updated_at = Utc::now();
        self.tables.write().await.theme = Some(row.clone());
        Ok(row)
    }

    async fn get_seo(&self) -> StoreResult<SeoSettings> {
        Ok(self.tables.read().await.seo.clone().unwrap_or_default())
    }

    async fn save_seo(&self, seo: &SeoSettings) -> StoreResult<SeoSettings> {
        let mut row = seo.clone();
        row.updated_at = Utc::now();
        self.tables.write().await.seo = Some(row.clone());
        Ok(row)
    }
}

#[async_trait]
impl StoreHealth for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::PostStatus;

    fn new_post(slug: &str, status: PostStatus) -> NewBlogPost {
        NewBlogPost {
            slug: slug.into(),
            title: slug.into(),
            excerpt: None,
            content: "Body".into(),
            cover_image_url: None,
            status,
            tags: vec!["news".into()],
            published_at: (status == PostStatus::Published).then(Utc::now),
        }
    }

    #[tokio::test]
    async fn test_post_slug_conflict() {
        let store = MemoryStore::new();
        store.create_post(new_post("hello", PostStatus::Draft)).await.unwrap();
        let err = store
            .create_post(new_post("hello", PostStatus::Draft))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_save_post_rejects_taken_slug() {
        let store = MemoryStore::new();
        store.create_post(new_post("first", PostStatus::Draft)).await.unwrap();
        let mut second = store.create_post(new_post("second", PostStatus::Draft)).await.unwrap();

        second.slug = "first".into();
        assert!(matches!(
            store.save_post(&second).await,
            Err(StoreError::Conflict(_))
        ));

        second.title = "Renamed".into();
        second.slug = "second".into();
        assert_eq!(store.save_post(&second).await.unwrap().title, "Renamed");
    }

    #[tokio::test]
    async fn test_list_posts_filters_and_pages() {
        let store = MemoryStore::new();
        for slug in ["a", "b", "c"] {
            store.create_post(new_post(slug, PostStatus::Published)).await.unwrap();
        }
        store.create_post(new_post("d", PostStatus::Draft)).await.unwrap();

        let page = store
            .list_posts(BlogPostFilter::published(), PageParams::new(Some(2), None))
            .await
            .unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.data.len(), 2);
        assert!(page.data.iter().all(|p| p.is_public()));
    }

    #[tokio::test]
    async fn test_subscriber_email_unique() {
        let store = MemoryStore::new();
        store.create_subscriber("fan@example.com", None).await.unwrap();
        let err = store
            .create_subscriber("fan@example.com", Some("footer"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        let found = store.find_subscriber_by_email("fan@example.com").await.unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn test_save_subscriber_toggle() {
        let store = MemoryStore::new();
        let mut sub = store.create_subscriber("fan@example.com", None).await.unwrap();
        sub.set_active(false, Utc::now());
        let saved = store.save_subscriber(&sub).await.unwrap();
        assert!(!saved.is_active);

        let active = store
            .list_subscribers(SubscriberFilter { active: Some(true) }, PageParams::default())
            .await
            .unwrap();
        assert_eq!(active.total, 0);
    }

    #[tokio::test]
    async fn test_settings_default_then_saved() {
        let store = MemoryStore::new();
        assert_eq!(store.get_theme().await.unwrap(), ThemeSettings::default());

        let theme = ThemeSettings {
            accent_color: "#123456".into(),
            ..Default::default()
        };
        store.save_theme(&theme).await.unwrap();
        assert_eq!(store.get_theme().await.unwrap().accent_color, "#123456");
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let store = MemoryStore::new();
        assert_eq!(
            store.delete_intake(Uuid::new_v4()).await,
            Err(StoreError::NotFound)
        );
    }

    fn block(section: &str, key: &str, sort_order: i32) -> ContentBlock {
        let now = Utc::now();
        ContentBlock {
            id: Uuid::new_v4(),
            section: section.into(),
            key: key.into(),
            title: None,
            body: format!("{} copy", key),
            media_url: None,
            sort_order,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_content_block_address_is_unique() {
        let store = MemoryStore::new();
        store.insert_block(&block("home", "hero-title", 0)).await.unwrap();
        assert!(matches!(
            store.insert_block(&block("home", "hero-title", 1)).await,
            Err(StoreError::Conflict(_))
        ));
        // Same key in another section is a different block.
        store.insert_block(&block("services", "hero-title", 0)).await.unwrap();

        let found = store.get_block_by_key("home", "hero-title").await.unwrap();
        assert_eq!(found.body, "hero-title copy");
    }

    #[tokio::test]
    async fn test_list_blocks_orders_within_section() {
        let store = MemoryStore::new();
        store.insert_block(&block("home", "outro", 2)).await.unwrap();
        store.insert_block(&block("home", "hero-title", 0)).await.unwrap();
        store.insert_block(&block("home", "hero-body", 1)).await.unwrap();
        store.insert_block(&block("about", "story", 0)).await.unwrap();

        let home = store
            .list_blocks(
                ContentBlockFilter {
                    section: Some("home".into()),
                },
                PageParams::default(),
            )
            .await
            .unwrap();
        let keys: Vec<&str> = home.data.iter().map(|b| b.key.as_str()).collect();
        assert_eq!(keys, ["hero-title", "hero-body", "outro"]);
        assert_eq!(home.total, 3);
    }

    #[tokio::test]
    async fn test_save_block_keeps_address() {
        let store = MemoryStore::new();
        let mut stored = store.insert_block(&block("home", "hero-title", 0)).await.unwrap();

        stored.section = "elsewhere".into();
        stored.body = "Updated".into();
        let saved = store.save_block(&stored).await.unwrap();
        assert_eq!(saved.section, "home");
        assert_eq!(saved.body, "Updated");

        store.delete_block(saved.id).await.unwrap();
        assert_eq!(store.get_block(saved.id).await, Err(StoreError::NotFound));
    }
}
