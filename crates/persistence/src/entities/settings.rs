//! Theme and SEO settings entities (single-row tables).

use chrono::{DateTime, Utc};
use domain::models::{SeoSettings, ThemeSettings};
use sqlx::FromRow;

/// Database row mapping for the theme_settings table.
#[derive(Debug, Clone, FromRow)]
pub struct ThemeSettingsEntity {
    pub primary_color: String,
    pub secondary_color: String,
    pub accent_color: String,
    pub background_color: String,
    pub text_color: String,
    pub admin_primary_color: String,
    pub admin_background_color: String,
    pub heading_font: String,
    pub body_font: String,
    pub border_radius: String,
    pub updated_at: DateTime<Utc>,
}

impl From<ThemeSettingsEntity> for ThemeSettings {
    fn from(entity: ThemeSettingsEntity) -> Self {
        Self {
            primary_color: entity.primary_color,
            secondary_color: entity.secondary_color,
            accent_color: entity.accent_color,
            background_color: entity.background_color,
            text_color: entity.text_color,
            admin_primary_color: entity.admin_primary_color,
            admin_background_color: entity.admin_background_color,
            heading_font: entity.heading_font,
            body_font: entity.body_font,
            border_radius: entity.border_radius,
            updated_at: entity.updated_at,
        }
    }
}

/// Database row mapping for the seo_settings table.
#[derive(Debug, Clone, FromRow)]
pub struct SeoSettingsEntity {
    pub site_title: String,
    pub site_description: String,
    pub og_image_url: Option<String>,
    pub keywords: Vec<String>,
    pub twitter_handle: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<SeoSettingsEntity> for SeoSettings {
    fn from(entity: SeoSettingsEntity) -> Self {
        Self {
            site_title: entity.site_title,
            site_description: entity.site_description,
            og_image_url: entity.og_image_url,
            keywords: entity.keywords,
            twitter_handle: entity.twitter_handle,
            updated_at: entity.updated_at,
        }
    }
}
