use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::entities::{
    option_fields::OptionField,
    status::ContentStatus,
    validation::{
        blank_to_none, new_validation_error, normalize_labels, trim_field, trim_optional, validate_http_url,
        validate_labels, validate_optional_url_field, validate_slug, MAX_SLUG_LENGTH, MIN_SLUG_LENGTH,
    },
};

const MAX_TITLE_LENGTH: u64 = 120;
const MAX_DESCRIPTION_LENGTH: u64 = 500;
const MAX_CATEGORY_LENGTH: u64 = 50;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub content: Option<String>,
    pub technologies: Vec<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub featured: bool,
    pub status: ContentStatus,
    pub views: i64,
    #[serde(rename = "order")]
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewProjectRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = MAX_TITLE_LENGTH, message = "Title is required (max 120 characters)"))]
    pub title: String,

    #[validate(
        length(min = MIN_SLUG_LENGTH, max = MAX_SLUG_LENGTH, message = "Slug must be 3-80 characters"),
        custom(function = "validate_slug")
    )]
    pub slug: Option<String>,

    #[serde(default)]
    #[validate(length(min = 1, max = MAX_DESCRIPTION_LENGTH, message = "Description is required (max 500 characters)"))]
    pub description: String,

    pub content: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_labels"))]
    pub technologies: Vec<String>,

    #[validate(length(max = MAX_CATEGORY_LENGTH, message = "Category must be at most 50 characters"))]
    pub category: Option<String>,

    #[validate(custom(function = "validate_http_url"))]
    pub image_url: Option<String>,

    #[validate(custom(function = "validate_http_url"))]
    pub github_url: Option<String>,

    #[validate(custom(function = "validate_http_url"))]
    pub live_url: Option<String>,

    #[serde(default)]
    pub featured: bool,

    #[serde(default)]
    pub status: ContentStatus,

    #[serde(default, rename = "order")]
    #[validate(range(min = 0, message = "Order must not be negative"))]
    pub display_order: i32,
}

/// Normalized document ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectInsert {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub content: Option<String>,
    pub technologies: Vec<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub featured: bool,
    pub status: ContentStatus,
    pub display_order: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateProjectRequest {
    #[validate(length(min = 1, max = MAX_TITLE_LENGTH, message = "Title must be 1-120 characters"))]
    pub title: Option<String>,

    #[validate(
        length(min = MIN_SLUG_LENGTH, max = MAX_SLUG_LENGTH, message = "Slug must be 3-80 characters"),
        custom(function = "validate_slug")
    )]
    pub slug: Option<String>,

    #[validate(length(min = 1, max = MAX_DESCRIPTION_LENGTH, message = "Description must be 1-500 characters"))]
    pub description: Option<String>,

    pub content: OptionField<String>,

    #[validate(custom(function = "validate_labels"))]
    pub technologies: Option<Vec<String>>,

    #[validate(length(max = MAX_CATEGORY_LENGTH, message = "Category must be at most 50 characters"))]
    pub category: OptionField<String>,

    #[validate(custom(function = "validate_optional_url_field"))]
    pub image_url: OptionField<String>,

    #[validate(custom(function = "validate_optional_url_field"))]
    pub github_url: OptionField<String>,

    #[validate(custom(function = "validate_optional_url_field"))]
    pub live_url: OptionField<String>,

    pub featured: Option<bool>,

    pub status: Option<ContentStatus>,

    #[serde(rename = "order")]
    #[validate(range(min = 0, message = "Order must not be negative"))]
    pub display_order: Option<i32>,
}

impl TryFrom<NewProjectRequest> for ProjectInsert {
    type Error = ValidationErrors;

    fn try_from(mut value: NewProjectRequest) -> Result<Self, Self::Error> {
        trim_field(&mut value.title);
        trim_field(&mut value.description);
        value.validate()?;

        let slug = resolve_new_slug(value.slug, &value.title)?;

        Ok(ProjectInsert {
            title: value.title,
            slug,
            description: value.description,
            content: blank_to_none(value.content),
            technologies: normalize_labels(value.technologies),
            category: blank_to_none(value.category),
            image_url: blank_to_none(value.image_url),
            github_url: blank_to_none(value.github_url),
            live_url: blank_to_none(value.live_url),
            featured: value.featured,
            status: value.status,
            display_order: value.display_order,
        })
    }
}

impl UpdateProjectRequest {
    /// Validates and normalizes the patch. A new title without an explicit
    /// slug re-derives the slug.
    pub fn normalize(mut self) -> Result<Self, ValidationErrors> {
        trim_optional(&mut self.title);
        trim_optional(&mut self.description);
        self.validate()?;

        if self.slug.is_none() {
            if let Some(title) = &self.title {
                self.slug = Some(resolve_new_slug(None, title)?);
            }
        }
        self.technologies = self.technologies.map(normalize_labels);
        self.content = self.content.normalize_blank();
        self.category = self.category.normalize_blank();
        self.image_url = self.image_url.normalize_blank();
        self.github_url = self.github_url.normalize_blank();
        self.live_url = self.live_url.normalize_blank();
        Ok(self)
    }
}

/// Uses the explicit slug when given, otherwise derives one from the title.
pub fn resolve_new_slug(explicit: Option<String>, title: &str) -> Result<String, ValidationErrors> {
    if let Some(slug) = explicit.filter(|s| !s.trim().is_empty()) {
        return Ok(slug);
    }

    let generated = slug::slugify(title);
    if generated.len() < MIN_SLUG_LENGTH as usize {
        let mut errors = ValidationErrors::new();
        errors.add("slug", new_validation_error("slug_too_short", "Generated slug is too short; please provide a custom slug"));
        return Err(errors);
    }
    Ok(generated.chars().take(MAX_SLUG_LENGTH as usize).collect::<String>().trim_end_matches('-').to_string())
}
