use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::entities::{
    option_fields::OptionField,
    status::ContentStatus,
    validation::{
        blank_to_none, new_validation_error, normalize_labels, trim_field, trim_optional, validate_http_url,
        validate_labels, validate_optional_url_field,
    },
};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub issuer: String,
    pub issue_date: NaiveDate,
    pub expiry_date: Option<NaiveDate>,
    pub credential_id: Option<String>,
    pub credential_url: Option<String>,
    pub image_url: Option<String>,
    pub skills: Vec<String>,
    pub status: ContentStatus,
    #[serde(rename = "order")]
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewCertificationRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 150, message = "Name is required (max 150 characters)"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Issuer is required (max 100 characters)"))]
    pub issuer: String,

    #[validate(required(message = "Issue date is required"))]
    pub issue_date: Option<NaiveDate>,

    pub expiry_date: Option<NaiveDate>,

    #[validate(length(max = 100, message = "Credential ID must be at most 100 characters"))]
    pub credential_id: Option<String>,

    #[validate(custom(function = "validate_http_url"))]
    pub credential_url: Option<String>,

    #[validate(custom(function = "validate_http_url"))]
    pub image_url: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_labels"))]
    pub skills: Vec<String>,

    #[serde(default)]
    pub status: ContentStatus,

    #[serde(default, rename = "order")]
    #[validate(range(min = 0, message = "Order must not be negative"))]
    pub display_order: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CertificationInsert {
    pub name: String,
    pub issuer: String,
    pub issue_date: NaiveDate,
    pub expiry_date: Option<NaiveDate>,
    pub credential_id: Option<String>,
    pub credential_url: Option<String>,
    pub image_url: Option<String>,
    pub skills: Vec<String>,
    pub status: ContentStatus,
    pub display_order: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateCertificationRequest {
    #[validate(length(min = 1, max = 150, message = "Name must be 1-150 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Issuer must be 1-100 characters"))]
    pub issuer: Option<String>,

    pub issue_date: Option<NaiveDate>,

    pub expiry_date: OptionField<NaiveDate>,

    #[validate(length(max = 100, message = "Credential ID must be at most 100 characters"))]
    pub credential_id: OptionField<String>,

    #[validate(custom(function = "validate_optional_url_field"))]
    pub credential_url: OptionField<String>,

    #[validate(custom(function = "validate_optional_url_field"))]
    pub image_url: OptionField<String>,

    #[validate(custom(function = "validate_labels"))]
    pub skills: Option<Vec<String>>,

    pub status: Option<ContentStatus>,

    #[serde(rename = "order")]
    #[validate(range(min = 0, message = "Order must not be negative"))]
    pub display_order: Option<i32>,
}

fn check_expiry(issue: Option<NaiveDate>, expiry: Option<NaiveDate>) -> Result<(), ValidationErrors> {
    match (issue, expiry) {
        (Some(issue), Some(expiry)) if expiry < issue => {
            let mut errors = ValidationErrors::new();
            errors.add(
                "expiry_date",
                new_validation_error("expiry_before_issue", "Expiry date must be on or after the issue date"),
            );
            Err(errors)
        }
        _ => Ok(()),
    }
}

impl TryFrom<NewCertificationRequest> for CertificationInsert {
    type Error = ValidationErrors;

    fn try_from(mut value: NewCertificationRequest) -> Result<Self, Self::Error> {
        trim_field(&mut value.name);
        trim_field(&mut value.issuer);
        value.validate()?;
        check_expiry(value.issue_date, value.expiry_date)?;

        let Some(issue_date) = value.issue_date else {
            let mut errors = ValidationErrors::new();
            errors.add("issue_date", new_validation_error("required", "Issue date is required"));
            return Err(errors);
        };

        Ok(CertificationInsert {
            name: value.name,
            issuer: value.issuer,
            issue_date,
            expiry_date: value.expiry_date,
            credential_id: blank_to_none(value.credential_id),
            credential_url: blank_to_none(value.credential_url),
            image_url: blank_to_none(value.image_url),
            skills: normalize_labels(value.skills),
            status: value.status,
            display_order: value.display_order,
        })
    }
}

impl UpdateCertificationRequest {
    pub fn normalize(mut self) -> Result<Self, ValidationErrors> {
        trim_optional(&mut self.name);
        trim_optional(&mut self.issuer);
        self.validate()?;
        check_expiry(self.issue_date, self.expiry_date.value_ref().copied())?;

        self.credential_id = self.credential_id.normalize_blank();
        self.credential_url = self.credential_url.normalize_blank();
        self.image_url = self.image_url.normalize_blank();
        self.skills = self.skills.map(normalize_labels);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_before_issue_is_rejected() {
        let req: NewCertificationRequest = serde_json::from_value(serde_json::json!({
            "name": "AWS Solutions Architect",
            "issuer": "Amazon",
            "issueDate": "2024-03-01",
            "expiryDate": "2023-03-01"
        }))
        .unwrap();
        let errors = CertificationInsert::try_from(req).unwrap_err();
        assert!(errors.field_errors().contains_key("expiry_date"));
    }

    #[test]
    fn valid_certification_is_normalized() {
        let req: NewCertificationRequest = serde_json::from_value(serde_json::json!({
            "name": " CKA ",
            "issuer": "CNCF",
            "issueDate": "2024-03-01",
            "credentialUrl": "",
            "skills": ["kubernetes", "Kubernetes"]
        }))
        .unwrap();
        let insert = CertificationInsert::try_from(req).unwrap();
        assert_eq!(insert.name, "CKA");
        assert_eq!(insert.credential_url, None);
        assert_eq!(insert.skills, vec!["kubernetes".to_string()]);
    }

    #[test]
    fn blank_issuer_is_rejected() {
        let req: NewCertificationRequest = serde_json::from_value(serde_json::json!({
            "name": "CKA",
            "issuer": "   ",
            "issueDate": "2024-03-01"
        }))
        .unwrap();
        let errors = CertificationInsert::try_from(req).unwrap_err();
        assert!(errors.field_errors().contains_key("issuer"));
    }

    #[test]
    fn missing_issue_date_is_reported() {
        let req: NewCertificationRequest = serde_json::from_value(serde_json::json!({
            "name": "CKA",
            "issuer": "CNCF"
        }))
        .unwrap();
        let errors = CertificationInsert::try_from(req).unwrap_err();
        assert!(errors.field_errors().contains_key("issue_date"));
    }
}
