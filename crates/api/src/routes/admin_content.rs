//! Admin CRUD for blog posts, events, gallery assets and site copy.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use domain::models::{
    AssetType, BlogPost, BlogPostFilter, ContentBlock, ContentBlockFilter, CreateBlogPostRequest,
    CreateContentBlockRequest, CreateEventRequest, CreateGalleryAssetRequest, Event, EventFilter,
    GalleryAsset, GalleryFilter, PostStatus, UpdateBlogPostRequest, UpdateContentBlockRequest,
    UpdateEventRequest, UpdateGalleryAssetRequest,
};
use serde::Deserialize;
use shared::pagination::{Page, PageParams};
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ValidatedJson;
use crate::middleware::AdminSession;

#[derive(Debug, Default, Deserialize)]
pub struct AdminPostsQuery {
    pub status: Option<PostStatus>,
    pub tag: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AdminEventsQuery {
    pub upcoming: Option<bool>,
    pub featured: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AdminGalleryQuery {
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub asset_type: Option<AssetType>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AdminContentQuery {
    pub section: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// ============================================================================
// Blog posts
// ============================================================================

/// GET /api/admin/posts
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<AdminPostsQuery>,
) -> Result<Json<Page<BlogPost>>, ApiError> {
    let filter = BlogPostFilter {
        status: query.status,
        tag: query.tag,
    };
    let page = state
        .store
        .list_posts(filter, PageParams::new(query.limit, query.offset))
        .await?;
    Ok(Json(page))
}

/// Create a post. The slug defaults to the slugified title.
///
/// POST /api/admin/posts
pub async fn create_post(
    State(state): State<AppState>,
    session: AdminSession,
    ValidatedJson(request): ValidatedJson<CreateBlogPostRequest>,
) -> Result<(StatusCode, Json<BlogPost>), ApiError> {
    let new_post = request.into_new_post(Utc::now()).ok_or_else(|| {
        ApiError::Validation("Title must contain letters or digits to derive a slug".to_string())
    })?;
    let post = state.store.create_post(new_post).await?;

    info!(post_id = %post.id, slug = %post.slug, user_id = %session.user_id, "Blog post created");
    Ok((StatusCode::CREATED, Json(post)))
}

/// GET /api/admin/posts/:id
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BlogPost>, ApiError> {
    Ok(Json(state.store.get_post(id).await?))
}

/// PUT /api/admin/posts/:id
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateBlogPostRequest>,
) -> Result<Json<BlogPost>, ApiError> {
    let mut post = state.store.get_post(id).await?;
    request.apply_to(&mut post, Utc::now());
    let post = state.store.save_post(&post).await?;

    info!(post_id = %post.id, status = %post.status, "Blog post updated");
    Ok(Json(post))
}

/// DELETE /api/admin/posts/:id
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_post(id).await?;
    info!(post_id = %id, "Blog post deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Events
// ============================================================================

/// GET /api/admin/events
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<AdminEventsQuery>,
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

/// POST /api/admin/events
pub async fn create_event(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    let event = state
        .store
        .insert_event(&request.into_event(Utc::now()))
        .await?;

    info!(event_id = %event.id, "Event created");
    Ok((StatusCode::CREATED, Json(event)))
}

/// GET /api/admin/events/:id
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Event>, ApiError> {
    Ok(Json(state.store.get_event(id).await?))
}

/// PUT /api/admin/events/:id
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateEventRequest>,
) -> Result<Json<Event>, ApiError> {
    let mut event = state.store.get_event(id).await?;
    request.apply_to(&mut event, Utc::now());
    Ok(Json(state.store.save_event(&event).await?))
}

/// DELETE /api/admin/events/:id
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_event(id).await?;
    info!(event_id = %id, "Event deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Gallery
// ============================================================================

/// GET /api/admin/gallery
pub async fn list_gallery(
    State(state): State<AppState>,
    Query(query): Query<AdminGalleryQuery>,
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

/// POST /api/admin/gallery
pub async fn create_asset(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateGalleryAssetRequest>,
) -> Result<(StatusCode, Json<GalleryAsset>), ApiError> {
    let asset = state
        .store
        .insert_asset(&request.into_asset(Utc::now()))
        .await?;

    info!(asset_id = %asset.id, category = %asset.category, "Gallery asset created");
    Ok((StatusCode::CREATED, Json(asset)))
}

/// PUT /api/admin/gallery/:id
pub async fn update_asset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateGalleryAssetRequest>,
) -> Result<Json<GalleryAsset>, ApiError> {
    let mut asset = state.store.get_asset(id).await?;
    request.apply_to(&mut asset);
    Ok(Json(state.store.save_asset(&asset).await?))
}

/// DELETE /api/admin/gallery/:id
pub async fn delete_asset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_asset(id).await?;
    info!(asset_id = %id, "Gallery asset deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Site copy
// ============================================================================

/// GET /api/admin/content
pub async fn list_blocks(
    State(state): State<AppState>,
    Query(query): Query<AdminContentQuery>,
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

/// POST /api/admin/content
pub async fn create_block(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateContentBlockRequest>,
) -> Result<(StatusCode, Json<ContentBlock>), ApiError> {
    let block = state
        .store
        .insert_block(&request.into_content_block(Utc::now()))
        .await?;

    info!(
        block_id = %block.id,
        section = %block.section,
        key = %block.key,
        "Content block created"
    );
    Ok((StatusCode::CREATED, Json(block)))
}

/// GET /api/admin/content/:id
pub async fn get_block(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ContentBlock>, ApiError> {
    Ok(Json(state.store.get_block(id).await?))
}

/// PUT /api/admin/content/:id
pub async fn update_block(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateContentBlockRequest>,
) -> Result<Json<ContentBlock>, ApiError> {
    let mut block = state.store.get_block(id).await?;
    request.apply_to(&mut block, Utc::now());
    Ok(Json(state.store.save_block(&block).await?))
}

/// DELETE /api/admin/content/:id
pub async fn delete_block(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_block(id).await?;
    info!(block_id = %id, "Content block deleted");
    Ok(StatusCode::NO_CONTENT)
}
