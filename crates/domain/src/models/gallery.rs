//! Gallery asset domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Kind of media a gallery asset points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Image,
    Video,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Image => "image",
            AssetType::Video => "video",
        }
    }
}

impl std::fmt::Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AssetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(AssetType::Image),
            "video" => Ok(AssetType::Video),
            other => Err(format!("Unknown asset type: {}", other)),
        }
    }
}

/// A media asset stored in the external object store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GalleryAsset {
    pub id: Uuid,
    pub title: Option<String>,
    pub url: String,
    pub category: String,
    pub asset_type: AssetType,
    pub alt_text: Option<String>,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

/// Request to register a gallery asset.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateGalleryAssetRequest {
    #[validate(length(max = 200, message = "Title must be at most 200 characters"))]
    pub title: Option<String>,

    #[validate(custom(function = "shared::validation::validate_http_url"))]
    pub url: String,

    #[validate(length(min = 1, max = 50, message = "Category must be 1-50 characters"))]
    pub category: String,

    pub asset_type: AssetType,

    #[validate(length(max = 300, message = "Alt text must be at most 300 characters"))]
    pub alt_text: Option<String>,

    #[serde(default)]
    pub sort_order: i32,
}

impl CreateGalleryAssetRequest {
    pub fn into_asset(self, now: DateTime<Utc>) -> GalleryAsset {
        GalleryAsset {
            id: Uuid::new_v4(),
            title: self.title,
            url: self.url,
            category: self.category.trim().to_lowercase(),
            asset_type: self.asset_type,
            alt_text: self.alt_text,
            sort_order: self.sort_order,
            created_at: now,
        }
    }
}

/// Request to update a gallery asset.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateGalleryAssetRequest {
    #[validate(length(max = 200, message = "Title must be at most 200 characters"))]
    pub title: Option<String>,

    #[validate(custom(function = "shared::validation::validate_http_url"))]
    pub url: Option<String>,

    #[validate(length(min = 1, max = 50, message = "Category must be 1-50 characters"))]
    pub category: Option<String>,

    pub asset_type: Option<AssetType>,

    #[validate(length(max = 300, message = "Alt text must be at most 300 characters"))]
    pub alt_text: Option<String>,

    pub sort_order: Option<i32>,
}

impl UpdateGalleryAssetRequest {
    pub fn apply_to(self, asset: &mut GalleryAsset) {
        if let Some(title) = self.title {
            asset.title = Some(title);
        }
        if let Some(url) = self.url {
            asset.url = url;
        }
        if let Some(category) = self.category {
            asset.category = category;
        }
        if let Some(asset_type) = self.asset_type {
            asset.asset_type = asset_type;
        }
        if let Some(alt) = self.alt_text {
            asset.alt_text = Some(alt);
        }
        if let Some(order) = self.sort_order {
            asset.sort_order = order;
        }
    }
}

/// Filter for listing gallery assets.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GalleryFilter {
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub asset_type: Option<AssetType>,
}

impl GalleryFilter {
    pub fn matches(&self, asset: &GalleryAsset) -> bool {
        self.category.as_ref().map_or(true, |c| &asset.category == c)
            && self.asset_type.map_or(true, |t| asset.asset_type == t)
    }
}
