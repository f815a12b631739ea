//! SEO settings domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Site-wide SEO metadata (single row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SeoSettings {
    pub site_title: String,
    pub site_description: String,
    pub og_image_url: Option<String>,
    pub keywords: Vec<String>,
    pub twitter_handle: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Default for SeoSettings {
    fn default() -> Self {
        Self {
            site_title: "Studio".into(),
            site_description: String::new(),
            og_image_url: None,
            keywords: Vec::new(),
            twitter_handle: None,
            updated_at: DateTime::<Utc>::default(),
        }
    }
}

/// Admin update of SEO settings.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateSeoRequest {
    #[validate(length(min = 1, max = 70, message = "Site title must be 1-70 characters"))]
    pub site_title: Option<String>,

    #[validate(length(max = 300, message = "Site description must be at most 300 characters"))]
    pub site_description: Option<String>,

    #[validate(custom(function = "shared::validation::validate_http_url"))]
    pub og_image_url: Option<String>,

    #[validate(length(max = 30, message = "At most 30 keywords"))]
    pub keywords: Option<Vec<String>>,

    #[validate(length(max = 16, message = "Twitter handle must be at most 16 characters"))]
    pub twitter_handle: Option<String>,
}

impl UpdateSeoRequest {
    pub fn apply_to(self, seo: &mut SeoSettings, now: DateTime<Utc>) {
        if let Some(title) = self.site_title {
            seo.site_title = title;
        }
        if let Some(description) = self.site_description {
            seo.site_description = description;
        }
        if let Some(url) = self.og_image_url {
            seo.og_image_url = Some(url);
        }
        if let Some(keywords) = self.keywords {
            seo.keywords = keywords
                .into_iter()
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect();
        }
        if let Some(handle) = self.twitter_handle {
            let handle = handle.trim();
            seo.twitter_handle = if handle.is_empty() {
                None
            } else if handle.starts_with('@') {
                Some(handle.to_string())
            } else {
                Some(format!("@{}", handle))
            };
        }
        seo.updated_at = now;
    }
}
