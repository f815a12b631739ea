//! Domain models for the studio site.

pub mod analytics;
pub mod blog_post;
pub mod content_block;
pub mod event;
pub mod gallery;
pub mod intake;
pub mod seo;
pub mod subscriber;
pub mod theme;

pub use analytics::{AnalyticsEvent, AnalyticsRequest, NewAnalyticsEvent};
pub use blog_post::{
    BlogPost, BlogPostFilter, CreateBlogPostRequest, NewBlogPost, PostStatus,
    UpdateBlogPostRequest,
};
pub use content_block::{
    ContentBlock, ContentBlockFilter, CreateContentBlockRequest, UpdateContentBlockRequest,
};
pub use event::{CreateEventRequest, Event, EventFilter, UpdateEventRequest};
pub use gallery::{
    AssetType, CreateGalleryAssetRequest, GalleryAsset, GalleryFilter, UpdateGalleryAssetRequest,
};
pub use intake::{
    Intake, IntakeFilter, IntakeRequest, IntakeStatus, InvalidTransition, NewIntake,
    UpdateIntakeRequest,
};
pub use seo::{SeoSettings, UpdateSeoRequest};
pub use subscriber::{
    NewsletterRequest, SetActiveRequest, SubscribeOutcome, Subscriber, SubscriberFilter,
};
pub use theme::{ThemeSettings, UpdateThemeRequest};
