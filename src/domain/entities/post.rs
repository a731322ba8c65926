use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::{
    entities::{
        option_fields::OptionField,
        project::resolve_new_slug,
        status::ContentStatus,
        validation::{
            blank_to_none, normalize_labels, trim_field, trim_optional, validate_http_url, validate_labels,
            validate_optional_url_field, validate_slug, MAX_SLUG_LENGTH, MIN_SLUG_LENGTH,
        },
    },
    utils::markdown::{reading_time_minutes, safe_markdown_to_html},
};

// ───── Constants ──────────────────────────────────────────────────────
const MAX_TITLE_LENGTH: u64 = 120;
const MIN_EXCERPT_LENGTH: u64 = 10;
const MAX_EXCERPT_LENGTH: u64 = 300;
const MAX_AUTHOR_LENGTH: u64 = 80;

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
    pub author: Option<String>,
    pub reading_time: i32,
    pub status: ContentStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostInsert {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
    pub author: Option<String>,
    pub reading_time: i32,
    pub status: ContentStatus,
    pub published_at: Option<DateTime<Utc>>,
}

// ───── API Response Models ──────────────────────────────────────────

/// Detail view with the markdown rendered to sanitized HTML.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetailResponse {
    #[serde(flatten)]
    pub post: Post,
    pub content_html: String,
}

impl From<Post> for PostDetailResponse {
    fn from(post: Post) -> Self {
        let content_html = safe_markdown_to_html(&post.content);
        PostDetailResponse { post, content_html }
    }
}

// ───── Input & Validation Requests ──────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewPostRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = MAX_TITLE_LENGTH, message = "Title is required (max 120 characters)"))]
    pub title: String,

    #[validate(
        length(min = MIN_SLUG_LENGTH, max = MAX_SLUG_LENGTH, message = "Slug must be 3-80 characters"),
        custom(function = "validate_slug")
    )]
    pub slug: Option<String>,

    #[serde(default)]
    #[validate(length(min = MIN_EXCERPT_LENGTH, max = MAX_EXCERPT_LENGTH, message = "Excerpt must be 10-300 characters"))]
    pub excerpt: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,

    #[validate(custom(function = "validate_http_url"))]
    pub cover_image: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_labels"))]
    pub tags: Vec<String>,

    #[validate(length(max = MAX_AUTHOR_LENGTH, message = "Author must be at most 80 characters"))]
    pub author: Option<String>,

    #[serde(default)]
    pub status: ContentStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, max = MAX_TITLE_LENGTH, message = "Title must be 1-120 characters"))]
    pub title: Option<String>,

    #[validate(
        length(min = MIN_SLUG_LENGTH, max = MAX_SLUG_LENGTH, message = "Slug must be 3-80 characters"),
        custom(function = "validate_slug")
    )]
    pub slug: Option<String>,

    #[validate(length(min = MIN_EXCERPT_LENGTH, max = MAX_EXCERPT_LENGTH, message = "Excerpt must be 10-300 characters"))]
    pub excerpt: Option<String>,

    #[validate(length(min = 1, message = "Content cannot be empty"))]
    pub content: Option<String>,

    #[validate(custom(function = "validate_optional_url_field"))]
    pub cover_image: OptionField<String>,

    #[validate(custom(function = "validate_labels"))]
    pub tags: Option<Vec<String>>,

    #[validate(length(max = MAX_AUTHOR_LENGTH, message = "Author must be at most 80 characters"))]
    pub author: OptionField<String>,

    pub status: Option<ContentStatus>,

    /// Derived from `content`, never read from the body.
    #[serde(skip)]
    pub reading_time: Option<i32>,
}

// ───── Conversions ──────────────────────────────────────────────────

impl TryFrom<NewPostRequest> for PostInsert {
    type Error = ValidationErrors;

    fn try_from(mut value: NewPostRequest) -> Result<Self, Self::Error> {
        trim_field(&mut value.title);
        trim_field(&mut value.excerpt);
        if value.content.trim().is_empty() {
            value.content.clear();
        }
        value.validate()?;

        let slug = resolve_new_slug(value.slug, &value.title)?;
        let content = value.content;
        let published_at = value.status.is_published().then(Utc::now);

        Ok(PostInsert {
            title: value.title,
            slug,
            excerpt: value.excerpt,
            reading_time: reading_time_minutes(&content),
            content,
            cover_image: blank_to_none(value.cover_image),
            tags: normalize_labels(value.tags),
            author: blank_to_none(value.author),
            status: value.status,
            published_at,
        })
    }
}

impl UpdatePostRequest {
    /// Validates and normalizes the patch; recomputes the reading time when
    /// content changes.
    pub fn normalize(mut self) -> Result<Self, ValidationErrors> {
        trim_optional(&mut self.title);
        trim_optional(&mut self.excerpt);
        if self.content.as_deref().is_some_and(|c| c.trim().is_empty()) {
            self.content = Some(String::new());
        }
        self.validate()?;

        if self.slug.is_none() {
            if let Some(title) = &self.title {
                self.slug = Some(resolve_new_slug(None, title)?);
            }
        }
        self.reading_time = self.content.as_deref().map(reading_time_minutes);
        self.tags = self.tags.map(normalize_labels);
        self.cover_image = self.cover_image.normalize_blank();
        self.author = self.author.normalize_blank();
        Ok(self)
    }
}
