//! Gallery asset entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{AssetType, GalleryAsset};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the gallery_assets table.
#[derive(Debug, Clone, FromRow)]
pub struct GalleryAssetEntity {
    pub id: Uuid,
    pub title: Option<String>,
    pub url: String,
    pub category: String,
    pub asset_type: String,
    pub alt_text: Option<String>,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

impl From<GalleryAssetEntity> for GalleryAsset {
    fn from(entity: GalleryAssetEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            url: entity.url,
            category: entity.category,
            asset_type: entity
                .asset_type
                .parse::<AssetType>()
                .unwrap_or(AssetType::Image),
            alt_text: entity.alt_text,
            sort_order: entity.sort_order,
            created_at: entity.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_type_mapping() {
        let entity = GalleryAssetEntity {
            id: Uuid::new_v4(),
            title: None,
            url: "/v.mp4".into(),
            category: "studio".into(),
            asset_type: "video".into(),
            alt_text: None,
            sort_order: 1,
            created_at: Utc::now(),
        };
        let asset: GalleryAsset = entity.into();
        assert_eq!(asset.asset_type, AssetType::Video);
    }
}
