use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::entities::{
    option_fields::OptionField,
    status::ContentStatus,
    validation::{blank_to_none, new_validation_error, normalize_labels, trim_field, trim_optional, validate_labels},
};

const MAX_COMPANY_LENGTH: u64 = 100;
const MAX_POSITION_LENGTH: u64 = 100;
const MAX_LOCATION_LENGTH: u64 = 100;
const MAX_DESCRIPTION_LENGTH: u64 = 2000;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub company: String,
    pub position: String,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[serde(rename = "current")]
    pub is_current: bool,
    pub description: String,
    pub achievements: Vec<String>,
    pub technologies: Vec<String>,
    pub status: ContentStatus,
    #[serde(rename = "order")]
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewExperienceRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = MAX_COMPANY_LENGTH, message = "Company is required (max 100 characters)"))]
    pub company: String,

    #[serde(default)]
    #[validate(length(min = 1, max = MAX_POSITION_LENGTH, message = "Position is required (max 100 characters)"))]
    pub position: String,

    #[validate(length(max = MAX_LOCATION_LENGTH, message = "Location must be at most 100 characters"))]
    pub location: Option<String>,

    #[validate(length(max = 50, message = "Employment type must be at most 50 characters"))]
    pub employment_type: Option<String>,

    #[validate(required(message = "Start date is required"))]
    pub start_date: Option<NaiveDate>,

    pub end_date: Option<NaiveDate>,

    #[serde(default, rename = "current")]
    pub is_current: bool,

    #[serde(default)]
    #[validate(length(min = 1, max = MAX_DESCRIPTION_LENGTH, message = "Description is required (max 2000 characters)"))]
    pub description: String,

    #[serde(default)]
    #[validate(custom(function = "validate_achievements"))]
    pub achievements: Vec<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_labels"))]
    pub technologies: Vec<String>,

    #[serde(default)]
    pub status: ContentStatus,

    #[serde(default, rename = "order")]
    #[validate(range(min = 0, message = "Order must not be negative"))]
    pub display_order: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExperienceInsert {
    pub company: String,
    pub position: String,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_current: bool,
    pub description: String,
    pub achievements: Vec<String>,
    pub technologies: Vec<String>,
    pub status: ContentStatus,
    pub display_order: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateExperienceRequest {
    #[validate(length(min = 1, max = MAX_COMPANY_LENGTH, message = "Company must be 1-100 characters"))]
    pub company: Option<String>,

    #[validate(length(min = 1, max = MAX_POSITION_LENGTH, message = "Position must be 1-100 characters"))]
    pub position: Option<String>,

    #[validate(length(max = MAX_LOCATION_LENGTH, message = "Location must be at most 100 characters"))]
    pub location: OptionField<String>,

    #[validate(length(max = 50, message = "Employment type must be at most 50 characters"))]
    pub employment_type: OptionField<String>,

    pub start_date: Option<NaiveDate>,

    pub end_date: OptionField<NaiveDate>,

    #[serde(rename = "current")]
    pub is_current: Option<bool>,

    #[validate(length(min = 1, max = MAX_DESCRIPTION_LENGTH, message = "Description must be 1-2000 characters"))]
    pub description: Option<String>,

    #[validate(custom(function = "validate_achievements"))]
    pub achievements: Option<Vec<String>>,

    #[validate(custom(function = "validate_labels"))]
    pub technologies: Option<Vec<String>>,

    pub status: Option<ContentStatus>,

    #[serde(rename = "order")]
    #[validate(range(min = 0, message = "Order must not be negative"))]
    pub display_order: Option<i32>,
}

fn validate_achievements(items: &[String]) -> Result<(), validator::ValidationError> {
    if items.len() > 20 {
        return Err(new_validation_error("too_many_achievements", "At most 20 achievements are allowed"));
    }
    if items.iter().any(|a| a.chars().count() > 300) {
        return Err(new_validation_error("achievement_too_long", "Each achievement must be at most 300 characters"));
    }
    Ok(())
}

/// Cross-field date rules: an ongoing role has no end date and an end
/// date never precedes the start date.
fn check_dates(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    is_current: bool,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if is_current && end.is_some() {
        errors.add("end_date", new_validation_error("current_with_end_date", "A current position cannot have an end date"));
    }
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            errors.add("end_date", new_validation_error("end_before_start", "End date must be on or after the start date"));
        }
    }
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

impl TryFrom<NewExperienceRequest> for ExperienceInsert {
    type Error = ValidationErrors;

    fn try_from(mut value: NewExperienceRequest) -> Result<Self, Self::Error> {
        trim_field(&mut value.company);
        trim_field(&mut value.position);
        trim_field(&mut value.description);
        value.validate()?;
        check_dates(value.start_date, value.end_date, value.is_current)?;

        let start_date = match value.start_date {
            Some(date) => date,
            None => {
                let mut errors = ValidationErrors::new();
                errors.add("start_date", new_validation_error("required", "Start date is required"));
                return Err(errors);
            }
        };

        Ok(ExperienceInsert {
            company: value.company,
            position: value.position,
            location: blank_to_none(value.location),
            employment_type: blank_to_none(value.employment_type),
            start_date,
            end_date: value.end_date,
            is_current: value.is_current,
            description: value.description,
            achievements: value.achievements.into_iter()
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .collect(),
            technologies: normalize_labels(value.technologies),
            status: value.status,
            display_order: value.display_order,
        })
    }
}

impl UpdateExperienceRequest {
    /// Validates the patch on its own. Rules that also depend on stored
    /// values are enforced by the table's check constraints.
    pub fn normalize(mut self) -> Result<Self, ValidationErrors> {
        trim_optional(&mut self.company);
        trim_optional(&mut self.position);
        trim_optional(&mut self.description);
        self.validate()?;
        check_dates(
            self.start_date,
            self.end_date.value_ref().copied(),
            self.is_current.unwrap_or(false),
        )?;

        if self.is_current == Some(true) {
            self.end_date = OptionField::SetToNull;
        }
        self.location = self.location.normalize_blank();
        self.employment_type = self.employment_type.normalize_blank();
        self.technologies = self.technologies.map(normalize_labels);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(value: serde_json::Value) -> NewExperienceRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn missing_start_date_names_the_field() {
        let req = request(serde_json::json!({
            "company": "Acme",
            "position": "Engineer",
            "description": "Built things"
        }));
        let errors = ExperienceInsert::try_from(req).unwrap_err();
        assert!(errors.field_errors().contains_key("start_date"));
    }

    #[test]
    fn end_before_start_is_rejected() {
        let req = request(serde_json::json!({
            "company": "Acme",
            "position": "Engineer",
            "description": "Built things",
            "startDate": "2023-05-01",
            "endDate": "2022-01-01"
        }));
        let errors = ExperienceInsert::try_from(req).unwrap_err();
        assert!(errors.field_errors().contains_key("end_date"));
    }

    #[test]
    fn current_role_cannot_have_end_date() {
        let req = request(serde_json::json!({
            "company": "Acme",
            "position": "Engineer",
            "description": "Built things",
            "startDate": "2023-05-01",
            "endDate": "2024-01-01",
            "current": true
        }));
        assert!(ExperienceInsert::try_from(req).is_err());
    }

    #[test]
    fn blank_company_is_rejected() {
        let req = request(serde_json::json!({
            "company": "  ",
            "position": "Engineer",
            "description": "Built things",
            "startDate": "2023-05-01"
        }));
        let errors = ExperienceInsert::try_from(req).unwrap_err();
        assert!(errors.field_errors().contains_key("company"));

        let patch = UpdateExperienceRequest {
            description: Some("\n".into()),
            ..Default::default()
        };
        assert!(patch.normalize().unwrap_err().field_errors().contains_key("description"));
    }

    #[test]
    fn marking_current_clears_end_date() {
        let patch = UpdateExperienceRequest {
            is_current: Some(true),
            ..Default::default()
        }
        .normalize()
        .unwrap();
        assert_eq!(patch.end_date, OptionField::SetToNull);
    }
}
