use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::entities::{
    option_fields::OptionField,
    status::ContentStatus,
    validation::{blank_to_none, trim_field, trim_optional, validate_http_url, validate_optional_url_field},
};

const MAX_NAME_LENGTH: u64 = 100;
const MAX_ROLE_LENGTH: u64 = 100;
const MIN_CONTENT_LENGTH: u64 = 10;
const MAX_CONTENT_LENGTH: u64 = 1000;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub role: String,
    pub company: Option<String>,
    pub content: String,
    pub avatar_url: Option<String>,
    pub rating: Option<i16>,
    pub status: ContentStatus,
    #[serde(rename = "order")]
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewTestimonialRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = MAX_NAME_LENGTH, message = "Name is required (max 100 characters)"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(min = 1, max = MAX_ROLE_LENGTH, message = "Role is required (max 100 characters)"))]
    pub role: String,

    #[validate(length(max = MAX_NAME_LENGTH, message = "Company must be at most 100 characters"))]
    pub company: Option<String>,

    #[serde(default)]
    #[validate(length(min = MIN_CONTENT_LENGTH, max = MAX_CONTENT_LENGTH, message = "Content must be 10-1000 characters"))]
    pub content: String,

    #[validate(custom(function = "validate_http_url"))]
    pub avatar_url: Option<String>,

    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<i16>,

    #[serde(default)]
    pub status: ContentStatus,

    #[serde(default, rename = "order")]
    #[validate(range(min = 0, message = "Order must not be negative"))]
    pub display_order: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestimonialInsert {
    pub name: String,
    pub role: String,
    pub company: Option<String>,
    pub content: String,
    pub avatar_url: Option<String>,
    pub rating: Option<i16>,
    pub status: ContentStatus,
    pub display_order: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateTestimonialRequest {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = MAX_ROLE_LENGTH, message = "Role must be 1-100 characters"))]
    pub role: Option<String>,

    #[validate(length(max = MAX_NAME_LENGTH, message = "Company must be at most 100 characters"))]
    pub company: OptionField<String>,

    #[validate(length(min = MIN_CONTENT_LENGTH, max = MAX_CONTENT_LENGTH, message = "Content must be 10-1000 characters"))]
    pub content: Option<String>,

    #[validate(custom(function = "validate_optional_url_field"))]
    pub avatar_url: OptionField<String>,

    #[validate(custom(function = "validate_optional_rating"))]
    pub rating: OptionField<i16>,

    pub status: Option<ContentStatus>,

    #[serde(rename = "order")]
    #[validate(range(min = 0, message = "Order must not be negative"))]
    pub display_order: Option<i32>,
}

fn validate_optional_rating(value: &OptionField<i16>) -> Result<(), validator::ValidationError> {
    match value.value_ref() {
        Some(r) if !(1..=5).contains(r) => Err(crate::entities::validation::new_validation_error(
            "rating_range",
            "Rating must be between 1 and 5",
        )),
        _ => Ok(()),
    }
}

impl TryFrom<NewTestimonialRequest> for TestimonialInsert {
    type Error = ValidationErrors;

    fn try_from(mut value: NewTestimonialRequest) -> Result<Self, Self::Error> {
        trim_field(&mut value.name);
        trim_field(&mut value.role);
        trim_field(&mut value.content);
        value.validate()?;

        Ok(TestimonialInsert {
            name: value.name,
            role: value.role,
            company: blank_to_none(value.company),
            content: value.content,
            avatar_url: blank_to_none(value.avatar_url),
            rating: value.rating,
            status: value.status,
            display_order: value.display_order,
        })
    }
}

impl UpdateTestimonialRequest {
    pub fn normalize(mut self) -> Result<Self, ValidationErrors> {
        trim_optional(&mut self.name);
        trim_optional(&mut self.role);
        trim_optional(&mut self.content);
        self.validate()?;

        self.company = self.company.normalize_blank();
        self.avatar_url = self.avatar_url.normalize_blank();
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_out_of_range_is_rejected() {
        let req: NewTestimonialRequest = serde_json::from_value(serde_json::json!({
            "name": "Ada",
            "role": "CTO",
            "content": "Great engineer to work with.",
            "rating": 6
        }))
        .unwrap();
        let errors = TestimonialInsert::try_from(req).unwrap_err();
        assert!(errors.field_errors().contains_key("rating"));
    }

    #[test]
    fn whitespace_only_content_is_rejected() {
        let req: NewTestimonialRequest = serde_json::from_value(serde_json::json!({
            "name": "Ada",
            "role": "   ",
            "content": "             ",
            "rating": 5
        }))
        .unwrap();
        let errors = TestimonialInsert::try_from(req).unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("role"));
        assert!(fields.contains_key("content"));
    }

    #[test]
    fn patch_rating_is_checked_only_when_set() {
        assert!(UpdateTestimonialRequest::default().normalize().is_ok());
        let patch = UpdateTestimonialRequest {
            rating: OptionField::SetToValue(0),
            ..Default::default()
        };
        assert!(patch.normalize().is_err());
    }
}
