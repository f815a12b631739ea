//! Repository implementations for database operations.

pub mod analytics;
pub mod blog_post;
pub mod content_block;
pub mod event;
pub mod gallery_asset;
pub mod intake;
pub mod settings;
pub mod subscriber;

pub use analytics::AnalyticsRepository;
pub use blog_post::BlogPostRepository;
pub use content_block::ContentBlockRepository;
pub use event::EventRepository;
pub use gallery_asset::GalleryAssetRepository;
pub use intake::IntakeRepository;
pub use settings::SettingsRepository;
pub use subscriber::SubscriberRepository;
