//! Public read-only content: blog, events, gallery, site copy and SEO settings.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use domain::models::{
    AssetType, BlogPost, BlogPostFilter, ContentBlock, ContentBlockFilter, Event, EventFilter,
    GalleryAsset, GalleryFilter, SeoSettings,
};
use serde::Deserialize;
use shared::pagination::{Page, PageParams};

use crate::app::AppState;
use crate::error::ApiError;

/// Query for `GET /api/posts`.
#[derive(Debug, Default, Deserialize)]
pub struct PublicPostsQuery {
    pub tag: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PublicEventsQuery {
    pub upcoming: Option<bool>,
    pub featured: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PublicGalleryQuery {
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub asset_type: Option<AssetType>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PublicContentQuery {
    pub section: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Published posts, newest first.
///
/// GET /api/posts
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<PublicPostsQuery>,
) -> Result<Json<Page<BlogPost>>, ApiError> {
    let filter = BlogPostFilter {
        tag: query.tag,
        ..BlogPostFilter::published()
    };
    let page = state
        .store
        .list_posts(filter, PageParams::new(query.limit, query.offset))
        .await?;
    Ok(Json(page))
}

/// A single published post. Drafts and archived posts are not found.
///
/// GET /api/posts/:slug
pub async fn get_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<BlogPost>, ApiError> {
    let post = state.store.get_post_by_slug(&slug).await?;
    if !post.is_public() {
        return Err(ApiError::NotFound("Post not found".to_string()));
    }
    Ok(Json(post))
}

/// GET /api/events
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<PublicEventsQuery>,
) -> Result<Json<Page<Event>>, ApiError> {
    let filter = EventFilter {
        upcoming: query.upcoming,
        featured: query.featured,
    };
    let page = state
        .store
        .list_events(filter, PageParams::new(query.limit, query.offset))
        .await?;
    Ok(Json(page))
}

/// GET /api/gallery
pub async fn list_gallery(
    State(state): State<AppState>,
    Query(query): Query<PublicGalleryQuery>,
) -> Result<Json<Page<GalleryAsset>>, ApiError> {
    let filter = GalleryFilter {
        category: query.category,
        asset_type: query.asset_type,
    };
    let page = state
        .store
        .list_assets(filter, PageParams::new(query.limit, query.offset))
        .await?;
    Ok(Json(page))
}

/// Site copy blocks, grouped by section.
///
/// GET /api/content
pub async fn list_blocks(
    State(state): State<AppState>,
    Query(query): Query<PublicContentQuery>,
) -> Result<Json<Page<ContentBlock>>, ApiError> {
    let filter = ContentBlockFilter {
        section: query.section,
    };
    let page = state
        .store
        .list_blocks(filter, PageParams::new(query.limit, query.offset))
        .await?;
    Ok(Json(page))
}

/// GET /api/content/:section/:key
pub async fn get_block(
    State(state): State<AppState>,
    Path((section, key)): Path<(String, String)>,
) -> Result<Json<ContentBlock>, ApiError> {
    Ok(Json(state.store.get_block_by_key(&section, &key).await?))
}

/// GET /api/seo
pub async fn get_seo(State(state): State<AppState>) -> Result<Json<SeoSettings>, ApiError> {
    Ok(Json(state.store.get_seo().await?))
}
