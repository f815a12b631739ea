//! Repository for the single-row theme and SEO settings tables.
//!
//! Both tables hold one row with `id = 1`. Writes upsert that row.

use domain::models::{SeoSettings, ThemeSettings};
use sqlx::PgPool;

use crate::entities::{SeoSettingsEntity, ThemeSettingsEntity};
use crate::metrics::QueryTimer;

const THEME_COLUMNS: &str = "primary_color, secondary_color, accent_color, background_color, \
                             text_color, admin_primary_color, admin_background_color, \
                             heading_font, body_font, border_radius, updated_at";

const SEO_COLUMNS: &str =
    "site_title, site_description, og_image_url, keywords, twitter_handle, updated_at";

#[derive(Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_theme(&self) -> Result<Option<ThemeSettingsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("get_theme_settings");
        let result = sqlx::query_as::<_, ThemeSettingsEntity>(&format!(
            "SELECT {THEME_COLUMNS} FROM theme_settings WHERE id = 1"
        ))
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn upsert_theme(&self, theme: &ThemeSettings) -> Result<ThemeSettingsEntity, sqlx::Error> {
        let timer = QueryTimer::new("upsert_theme_settings");
        let result = sqlx::query_as::<_, ThemeSettingsEntity>(&format!(
            r#"
            INSERT INTO theme_settings (id, primary_color, secondary_color, accent_color,
                background_color, text_color, admin_primary_color, admin_background_color,
                heading_font, body_font, border_radius, updated_at)
            VALUES (1, $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NOW())
            ON CONFLICT (id) DO UPDATE SET
                primary_color = EXCLUDED.primary_color,
                secondary_color = EXCLUDED.secondary_color,
                accent_color = EXCLUDED.accent_color,
                background_color = EXCLUDED.background_color,
                text_color = EXCLUDED.text_color,
                admin_primary_color = EXCLUDED.admin_primary_color,
                admin_background_color = EXCLUDED.admin_background_color,
                heading_font = EXCLUDED.heading_font,
                body_font = EXCLUDED.body_font,
                border_radius = EXCLUDED.border_radius,
                updated_at = NOW()
            RETURNING {THEME_COLUMNS}
            "#
        ))
        .bind(&theme.primary_color)
        .bind(&theme.secondary_color)
        .bind(&theme.accent_color)
        .bind(&theme.background_color)
        .bind(&theme.text_color)
        .bind(&theme.admin_primary_color)
        .bind(&theme.admin_background_color)
        .bind(&theme.heading_font)
        .bind(&theme.body_font)
        .bind(&theme.border_radius)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn get_seo(&self) -> Result<Option<SeoSettingsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("get_seo_settings");
        let result = sqlx::query_as::<_, SeoSettingsEntity>(&format!(
            "SELECT {SEO_COLUMNS} FROM seo_settings WHERE id = 1"
        ))
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn upsert_seo(&self, seo: &SeoSettings) -> Result<SeoSettingsEntity, sqlx::Error> {
        let timer = QueryTimer::new("upsert_seo_settings");
        let result = sqlx::query_as::<_, SeoSettingsEntity>(&format!(
            r#"
            INSERT INTO seo_settings (id, site_title, site_description, og_image_url, keywords,
                twitter_handle, updated_at)
            VALUES (1, $1, $2, $3, $4, $5, NOW())
            ON CONFLICT (id) DO UPDATE SET
                site_title = EXCLUDED.site_title,
                site_description = EXCLUDED.site_description,
                og_image_url = EXCLUDED.og_image_url,
                keywords = EXCLUDED.keywords,
                twitter_handle = EXCLUDED.twitter_handle,
                updated_at = NOW()
            RETURNING {SEO_COLUMNS}
            "#
        ))
        .bind(&seo.site_title)
        .bind(&seo.site_description)
        .bind(&seo.og_image_url)
        .bind(&seo.keywords)
        .bind(&seo.twitter_handle)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}
