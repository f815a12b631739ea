//! Editable site copy.
//!
//! Hero text, service page copy and similar snippets are stored as blocks
//! addressed by `(section, key)`, e.g. `("home", "hero-title")`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A piece of editable text, optionally with a media reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ContentBlock {
    pub id: Uuid,
    pub section: String,
    pub key: String,
    pub title: Option<String>,
    pub body: String,
    pub media_url: Option<String>,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create a content block.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateContentBlockRequest {
    #[validate(length(min = 1, max = 50, message = "Section must be 1-50 characters"))]
    #[validate(custom(function = "shared::validation::validate_slug"))]
    pub section: String,

    #[validate(length(min = 1, max = 100, message = "Key must be 1-100 characters"))]
    #[validate(custom(function = "shared::validation::validate_slug"))]
    pub key: String,

    #[validate(length(max = 200, message = "Title must be at most 200 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 20000, message = "Body must be at most 20000 characters"))]
    #[serde(default)]
    pub body: String,

    #[validate(custom(function = "shared::validation::validate_http_url"))]
    pub media_url: Option<String>,

    #[serde(default)]
    pub sort_order: i32,
}

impl CreateContentBlockRequest {
    pub fn into_content_block(self, now: DateTime<Utc>) -> ContentBlock {
        ContentBlock {
            id: Uuid::new_v4(),
            section: self.section,
            key: self.key,
            title: self.title,
            body: self.body,
            media_url: self.media_url,
            sort_order: self.sort_order,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Request to update a content block. The `(section, key)` address is fixed
/// once created.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateContentBlockRequest {
    #[validate(length(max = 200, message = "Title must be at most 200 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 20000, message = "Body must be at most 20000 characters"))]
    pub body: Option<String>,

    #[validate(custom(function = "shared::validation::validate_http_url"))]
    pub media_url: Option<String>,

    pub sort_order: Option<i32>,
}

impl UpdateContentBlockRequest {
    pub fn apply_to(self, block: &mut ContentBlock, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            block.title = Some(title);
        }
        if let Some(body) = self.body {
            block.body = body;
        }
        if let Some(url) = self.media_url {
            block.media_url = Some(url);
        }
        if let Some(order) = self.sort_order {
            block.sort_order = order;
        }
        block.updated_at = now;
    }
}

/// Filter for listing content blocks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentBlockFilter {
    pub section: Option<String>,
}

impl ContentBlockFilter {
    pub fn matches(&self, block: &ContentBlock) -> bool {
        self.section
            .as_deref()
            .map_or(true, |section| block.section == section)
    }
}
