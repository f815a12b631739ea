//! Blog post repository for database operations.

use domain::models::{BlogPost, BlogPostFilter, NewBlogPost};
use shared::pagination::PageParams;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::BlogPostEntity;
use crate::metrics::QueryTimer;

const COLUMNS: &str = "id, slug, title, excerpt, content, cover_image_url, status, tags, \
                       published_at, created_at, updated_at";

/// Repository for blog post database operations.
#[derive(Clone)]
pub struct BlogPostRepository {
    pool: PgPool,
}

impl BlogPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, post: NewBlogPost) -> Result<BlogPostEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_blog_post");
        let result = sqlx::query_as::<_, BlogPostEntity>(&format!(
            r#"
            INSERT INTO blog_posts (slug, title, excerpt, content, cover_image_url, status, tags, published_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(post.slug)
        .bind(post.title)
        .bind(post.excerpt)
        .bind(post.content)
        .bind(post.cover_image_url)
        .bind(post.status.as_str())
        .bind(post.tags)
        .bind(post.published_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<BlogPostEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_blog_post_by_id");
        let result = sqlx::query_as::<_, BlogPostEntity>(&format!(
            "SELECT {COLUMNS} FROM blog_posts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<BlogPostEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_blog_post_by_slug");
        let result = sqlx::query_as::<_, BlogPostEntity>(&format!(
            "SELECT {COLUMNS} FROM blog_posts WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Lists posts newest first, returning the page and the total for the filter.
    pub async fn list(
        &self,
        filter: &BlogPostFilter,
        page: PageParams,
    ) -> Result<(Vec<BlogPostEntity>, i64), sqlx::Error> {
        let status = filter.status.map(|s| s.as_str());
        let tag = filter.tag.as_ref().map(|t| t.to_lowercase());

        let timer = QueryTimer::new("list_blog_posts");
        let rows = sqlx::query_as::<_, BlogPostEntity>(&format!(
            r#"
            SELECT {COLUMNS} FROM blog_posts
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::text IS NULL OR $2 = ANY(tags))
            ORDER BY COALESCE(published_at, created_at) DESC
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(status)
        .bind(tag.as_deref())
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM blog_posts
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::text IS NULL OR $2 = ANY(tags))
            "#,
        )
        .bind(status)
        .bind(tag.as_deref())
        .fetch_one(&self.pool)
        .await?;
        timer.record();

        Ok((rows, total))
    }

    pub async fn update(&self, post: &BlogPost) -> Result<Option<BlogPostEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_blog_post");
        let result = sqlx::query_as::<_, BlogPostEntity>(&format!(
            r#"
            UPDATE blog_posts
            SET slug = $2, title = $3, excerpt = $4, content = $5, cover_image_url = $6,
                status = $7, tags = $8, published_at = $9, updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(post.id)
        .bind(&post.slug)
        .bind(&post.title)
        .bind(&post.excerpt)
        .bind(&post.content)
        .bind(&post.cover_image_url)
        .bind(post.status.as_str())
        .bind(&post.tags)
        .bind(post.published_at)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_blog_post");
        let result = sqlx::query("DELETE FROM blog_posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
