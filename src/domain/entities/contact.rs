use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::entities::validation::{blank_to_none, trim_field, trim_optional};

pub const MAX_BULK_IDS: u64 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "contact_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    #[default]
    Unread,
    Read,
    Replied,
    Archived,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub status: ContactStatus,
    pub reply: Option<String>,
    pub replied_at: Option<DateTime<Utc>>,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ContactForm {
    #[serde(default)]
    #[validate(length(min = 2, max = 100, message = "Name must be 2-100 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(max = 150, message = "Subject must be at most 150 characters"))]
    pub subject: Option<String>,

    #[serde(default)]
    #[validate(length(min = 10, max = 5000, message = "Message must be 10-5000 characters"))]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContactInsert {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub ip_address: Option<String>,
}

impl ContactForm {
    /// Validates the form and tags it with the submitting client's address.
    pub fn into_insert(self, ip_address: Option<String>) -> Result<ContactInsert, ValidationErrors> {
        let form = self.normalized()?;
        Ok(ContactInsert {
            name: form.name,
            email: form.email.to_lowercase(),
            subject: blank_to_none(form.subject),
            message: form.message,
            ip_address,
        })
    }

    /// Trimmed and validated copy; length rules apply to the trimmed text.
    pub fn normalized(mut self) -> Result<Self, ValidationErrors> {
        trim_field(&mut self.name);
        trim_field(&mut self.email);
        trim_field(&mut self.message);
        trim_optional(&mut self.subject);
        self.validate()?;
        Ok(self)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContactListQuery {
    pub status: Option<ContactStatus>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateContactStatusRequest {
    pub status: ContactStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BulkAction {
    MarkRead,
    MarkUnread,
    Archive,
    Delete,
}

impl BulkAction {
    /// Status written by the action; `None` for deletion.
    pub fn target_status(self) -> Option<ContactStatus> {
        match self {
            BulkAction::MarkRead => Some(ContactStatus::Read),
            BulkAction::MarkUnread => Some(ContactStatus::Unread),
            BulkAction::Archive => Some(ContactStatus::Archived),
            BulkAction::Delete => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BulkContactRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = MAX_BULK_IDS, message = "Provide between 1 and 100 ids"))]
    pub ids: Vec<Uuid>,
    pub action: BulkAction,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkResult {
    pub affected: u64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReplyRequest {
    pub id: Uuid,

    #[validate(length(min = 1, max = 200, message = "Subject must be 1-200 characters"))]
    pub subject: Option<String>,

    #[serde(default)]
    #[validate(length(min = 1, max = 10000, message = "Reply message is required"))]
    pub message: String,
}

impl ReplyRequest {
    /// Trims the body before validation so a blank reply never reaches the mailer.
    pub fn normalized(mut self) -> Result<Self, ValidationErrors> {
        trim_field(&mut self.message);
        trim_optional(&mut self.subject);
        if self.subject.as_deref() == Some("") {
            self.subject = None;
        }
        self.validate()?;
        Ok(self)
    }

    /// Falls back to "Re: <original subject>" when no subject is given.
    pub fn subject_for(&self, original: &Contact) -> String {
        match self.subject.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(subject) => subject.to_string(),
            None => match original.subject.as_deref() {
                Some(subject) => format!("Re: {subject}"),
                None => "Re: your message".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateReplyRequest {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedReply {
    pub reply: String,
    pub generated: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactReceipt {
    #[serde(rename = "_id")]
    pub id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bulk_action_parses_camel_case() {
        let req: BulkContactRequest = serde_json::from_value(serde_json::json!({
            "ids": [Uuid::nil()],
            "action": "markRead"
        }))
        .unwrap();
        assert_eq!(req.action, BulkAction::MarkRead);
        assert_eq!(req.action.target_status(), Some(ContactStatus::Read));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn bulk_rejects_empty_and_oversized_id_lists() {
        let empty = BulkContactRequest { ids: vec![], action: BulkAction::Delete };
        assert!(empty.validate().is_err());

        let many = BulkContactRequest {
            ids: (0..101).map(|_| Uuid::new_v4()).collect(),
            action: BulkAction::Archive,
        };
        assert!(many.validate().is_err());
    }

    #[test]
    fn form_normalizes_email_and_blank_subject() {
        let form = ContactForm {
            name: "Ada".into(),
            email: "Ada@Example.com".into(),
            subject: Some("  ".into()),
            message: "I would like to hire you".into(),
        };
        let insert = form.into_insert(Some("10.0.0.1".into())).unwrap();
        assert_eq!(insert.email, "ada@example.com");
        assert_eq!(insert.subject, None);
        assert_eq!(insert.ip_address.as_deref(), Some("10.0.0.1"));
    }

    #[test]
    fn whitespace_does_not_count_towards_the_message() {
        let blank = ContactForm {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            subject: None,
            message: "            ".into(),
        };
        let errors = blank.into_insert(None).unwrap_err();
        assert!(errors.field_errors().contains_key("message"));

        let padded = ContactForm {
            name: " A ".into(),
            email: "ada@example.com".into(),
            subject: None,
            message: "   hi there      ".into(),
        };
        let errors = padded.into_insert(None).unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("message"));
        assert!(fields.contains_key("name"));
    }

    #[test]
    fn blank_reply_is_rejected() {
        let req = ReplyRequest { id: Uuid::nil(), subject: Some("  ".into()), message: " \n ".into() };
        let errors = req.normalized().unwrap_err();
        assert!(errors.field_errors().contains_key("message"));

        let req = ReplyRequest { id: Uuid::nil(), subject: Some("  ".into()), message: " Thanks! ".into() }
            .normalized()
            .unwrap();
        assert_eq!(req.message, "Thanks!");
        assert_eq!(req.subject, None);
    }

    #[test]
    fn reply_subject_defaults_to_original() {
        let now = Utc::now();
        let contact = Contact {
            id: Uuid::nil(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            subject: Some("Hiring".into()),
            message: "Hello there, are you available?".into(),
            status: ContactStatus::Unread,
            reply: None,
            replied_at: None,
            ip_address: None,
            created_at: now,
            updated_at: now,
        };
        let req = ReplyRequest { id: Uuid::nil(), subject: None, message: "Yes".into() };
        assert_eq!(req.subject_for(&contact), "Re: Hiring");
    }
}
