//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod blog_post;
pub mod content_block;
pub mod event;
pub mod gallery_asset;
pub mod intake;
pub mod settings;
pub mod subscriber;

pub use blog_post::BlogPostEntity;
pub use content_block::ContentBlockEntity;
pub use event::EventEntity;
pub use gallery_asset::GalleryAssetEntity;
pub use intake::IntakeEntity;
pub use settings::{SeoSettingsEntity, ThemeSettingsEntity};
pub use subscriber::SubscriberEntity;
