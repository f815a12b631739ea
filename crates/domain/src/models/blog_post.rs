//! Blog post domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::slug::slugify;
use std::str::FromStr;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Publication status of a blog post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
            PostStatus::Archived => "archived",
        }
    }
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            "archived" => Ok(PostStatus::Archived),
            other => Err(format!("Unknown post status: {}", other)),
        }
    }
}

/// A blog post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BlogPost {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub cover_image_url: Option<String>,
    pub status: PostStatus,
    pub tags: Vec<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BlogPost {
    /// Whether the post may be shown on the public site.
    pub fn is_public(&self) -> bool {
        self.status == PostStatus::Published
    }
}

/// Values for a new blog post, after defaults are resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBlogPost {
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub cover_image_url: Option<String>,
    pub status: PostStatus,
    pub tags: Vec<String>,
    pub published_at: Option<DateTime<Utc>>,
}

/// Request to create a blog post.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateBlogPostRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub title: String,

    /// Derived from the title when omitted.
    #[validate(length(max = 200, message = "Slug must be at most 200 characters"))]
    #[validate(custom(function = "shared::validation::validate_slug"))]
    pub slug: Option<String>,

    #[validate(length(max = 500, message = "Excerpt must be at most 500 characters"))]
    pub excerpt: Option<String>,

    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,

    #[validate(custom(function = "shared::validation::validate_http_url"))]
    pub cover_image_url: Option<String>,

    pub status: Option<PostStatus>,

    #[serde(default)]
    #[validate(custom(function = "validate_tags"))]
    pub tags: Vec<String>,
}

impl CreateBlogPostRequest {
    /// Resolves defaults: slug from title, draft status, publish timestamp.
    ///
    /// Returns `None` when no slug can be derived (punctuation-only title).
    pub fn into_new_post(self, now: DateTime<Utc>) -> Option<NewBlogPost> {
        let slug = match self.slug {
            Some(slug) => slug,
            None => slugify(&self.title),
        };
        if slug.is_empty() {
            return None;
        }
        let status = self.status.unwrap_or_default();
        let published_at = (status == PostStatus::Published).then_some(now);

        Some(NewBlogPost {
            slug,
            title: self.title.trim().to_string(),
            excerpt: self.excerpt,
            content: self.content,
            cover_image_url: self.cover_image_url,
            status,
            tags: normalize_tags(self.tags),
            published_at,
        })
    }
}

/// Request to update a blog post. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateBlogPostRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub title: Option<String>,

    #[validate(length(max = 200, message = "Slug must be at most 200 characters"))]
    #[validate(custom(function = "shared::validation::validate_slug"))]
    pub slug: Option<String>,

    #[validate(length(max = 500, message = "Excerpt must be at most 500 characters"))]
    pub excerpt: Option<String>,

    #[validate(length(min = 1, message = "Content is required"))]
    pub content: Option<String>,

    #[validate(custom(function = "shared::validation::validate_http_url"))]
    pub cover_image_url: Option<String>,

    pub status: Option<PostStatus>,

    #[validate(custom(function = "validate_tags"))]
    pub tags: Option<Vec<String>>,
}

impl UpdateBlogPostRequest {
    /// Merges the update into an existing post.
    ///
    /// The first transition to `published` stamps `published_at`; later
    /// status changes keep the original publication date.
    pub fn apply_to(self, post: &mut BlogPost, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            post.title = title.trim().to_string();
        }
        if let Some(slug) = self.slug {
            post.slug = slug;
        }
        if let Some(excerpt) = self.excerpt {
            post.excerpt = Some(excerpt);
        }
        if let Some(content) = self.content {
            post.content = content;
        }
        if let Some(url) = self.cover_image_url {
            post.cover_image_url = Some(url);
        }
        if let Some(tags) = self.tags {
            post.tags = normalize_tags(tags);
        }
        if let Some(status) = self.status {
            post.status = status;
            if status == PostStatus::Published && post.published_at.is_none() {
                post.published_at = Some(now);
            }
        }
        post.updated_at = now;
    }
}

/// Filter for listing blog posts.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlogPostFilter {
    pub status: Option<PostStatus>,
    pub tag: Option<String>,
}

impl BlogPostFilter {
    pub fn published() -> Self {
        Self {
            status: Some(PostStatus::Published),
            tag: None,
        }
    }

    pub fn matches(&self, post: &BlogPost) -> bool {
        self.status.map_or(true, |s| post.status == s)
            && self
                .tag
                .as_ref()
                .map_or(true, |t| post.tags.iter().any(|pt| pt.eq_ignore_ascii_case(t)))
    }
}

/// Lowercases, trims and de-duplicates tags while keeping their order.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

fn validate_tags(tags: &[String]) -> Result<(), ValidationError> {
    if tags.len() > 20 || tags.iter().any(|t| t.chars().count() > 50) {
        let mut err = ValidationError::new("tags");
        err.message = Some("At most 20 tags of up to 50 characters each".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_post() -> BlogPost {
        let now = Utc::now();
        BlogPost {
            id: Uuid::new_v4(),
            slug: "hello".into(),
            title: "Hello".into(),
            excerpt: None,
            content: "Body".into(),
            cover_image_url: None,
            status: PostStatus::Draft,
            tags: vec![],
            published_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn create_request(title: &str) -> CreateBlogPostRequest {
        CreateBlogPostRequest {
            title: title.into(),
            slug: None,
            excerpt: None,
            content: "Body".into(),
            cover_image_url: None,
            status: None,
            tags: vec![],
        }
    }

    #[test]
    fn test_post_status_serde() {
        assert_eq!(
            serde_json::to_string(&PostStatus::Published).unwrap(),
            "\"published\""
        );
        let status: PostStatus = serde_json::from_str("\"archived\"").unwrap();
        assert_eq!(status, PostStatus::Archived);
        assert!(serde_json::from_str::<PostStatus>("\"deleted\"").is_err());
    }

    #[test]
    fn test_post_status_from_str() {
        assert_eq!("draft".parse::<PostStatus>().unwrap(), PostStatus::Draft);
        assert!("Draft".parse::<PostStatus>().is_err());
    }

    #[test]
    fn test_create_derives_slug_from_title() {
        let new_post = create_request("My Post!! 2024")
            .into_new_post(Utc::now())
            .unwrap();
        assert_eq!(new_post.slug, "my-post-2024");
        assert_eq!(new_post.status, PostStatus::Draft);
        assert!(new_post.published_at.is_none());
    }

    #[test]
    fn test_create_keeps_explicit_slug() {
        let mut request = create_request("Anything");
        request.slug = Some("custom-slug".into());
        let new_post = request.into_new_post(Utc::now()).unwrap();
        assert_eq!(new_post.slug, "custom-slug");
    }

    #[test]
    fn test_create_published_sets_published_at() {
        let now = Utc::now();
        let mut request = create_request("Launch");
        request.status = Some(PostStatus::Published);
        let new_post = request.into_new_post(now).unwrap();
        assert_eq!(new_post.published_at, Some(now));
    }

    #[test]
    fn test_create_punctuation_title_has_no_slug() {
        assert!(create_request("!!!").into_new_post(Utc::now()).is_none());
    }

    #[test]
    fn test_create_validation() {
        assert!(create_request("Valid").validate().is_ok());
        assert!(create_request("   ").validate().is_err());

        let mut bad_slug = create_request("Valid");
        bad_slug.slug = Some("Not A Slug".into());
        assert!(bad_slug.validate().is_err());

        let mut too_many_tags = create_request("Valid");
        too_many_tags.tags = (0..21).map(|i| format!("t{}", i)).collect();
        assert!(too_many_tags.validate().is_err());
    }

    #[test]
    fn test_update_publish_stamps_once() {
        let mut post = sample_post();
        let first = Utc::now();
        UpdateBlogPostRequest {
            status: Some(PostStatus::Published),
            ..Default::default()
        }
        .apply_to(&mut post, first);
        assert_eq!(post.published_at, Some(first));

        let later = first + chrono::Duration::days(1);
        UpdateBlogPostRequest {
            status: Some(PostStatus::Published),
            ..Default::default()
        }
        .apply_to(&mut post, later);
        assert_eq!(post.published_at, Some(first));
        assert_eq!(post.updated_at, later);
    }

    #[test]
    fn test_update_leaves_absent_fields() {
        let mut post = sample_post();
        UpdateBlogPostRequest {
            title: Some("  New title ".into()),
            ..Default::default()
        }
        .apply_to(&mut post, Utc::now());
        assert_eq!(post.title, "New title");
        assert_eq!(post.slug, "hello");
        assert_eq!(post.content, "Body");
    }

    #[test]
    fn test_normalize_tags() {
        let tags = normalize_tags(vec![
            " News ".into(),
            "news".into(),
            "".into(),
            "Events".into(),
        ]);
        assert_eq!(tags, vec!["news".to_string(), "events".to_string()]);
    }

    #[test]
    fn test_filter_matches() {
        let mut post = sample_post();
        post.tags = vec!["news".into()];
        assert!(BlogPostFilter::default().matches(&post));
        assert!(!BlogPostFilter::published().matches(&post));

        post.status = PostStatus::Published;
        assert!(BlogPostFilter::published().matches(&post));

        let by_tag = BlogPostFilter {
            status: None,
            tag: Some("NEWS".into()),
        };
        assert!(by_tag.matches(&post));
    }
}
