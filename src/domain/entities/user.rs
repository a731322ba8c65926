use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::{
    domain::password::validate_password_strength,
    entities::{
        option_fields::OptionField,
        validation::{new_validation_error, trim_field, trim_optional, validate_optional_url_field},
    },
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    #[default]
    User,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::User => "user",
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct UserInsert {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
}

/// User as seen over the wire; the hash never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        PublicUser {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            avatar: user.avatar,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 2, max = 80, message = "Name must be 2-80 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[serde(default)]
    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: PublicUser,
    pub token: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, max = 80, message = "Name must be 2-80 characters"))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(custom(function = "validate_optional_url_field"))]
    pub avatar: OptionField<String>,

    pub current_password: Option<String>,

    #[validate(custom(function = "validate_password_strength"))]
    pub new_password: Option<String>,
}

/// Profile changes after the password (if any) has been re-hashed.
#[derive(Debug, Default, Clone)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar: OptionField<String>,
    pub password_hash: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.avatar.is_unchanged()
            && self.password_hash.is_none()
    }
}

impl RegisterRequest {
    pub fn normalized(mut self) -> Result<Self, ValidationErrors> {
        trim_field(&mut self.name);
        trim_field(&mut self.email);
        self.validate()?;
        self.email = self.email.to_lowercase();
        Ok(self)
    }
}

impl LoginRequest {
    pub fn normalized(mut self) -> Result<Self, ValidationErrors> {
        trim_field(&mut self.email);
        self.validate()?;
        self.email = self.email.to_lowercase();
        Ok(self)
    }
}

impl UpdateProfileRequest {
    pub fn normalize(mut self) -> Result<Self, ValidationErrors> {
        trim_optional(&mut self.name);
        trim_optional(&mut self.email);
        self.validate()?;
        if self.new_password.is_some() && self.current_password.as_deref().is_none_or(str::is_empty) {
            let mut errors = ValidationErrors::new();
            errors.add(
                "current_password",
                new_validation_error("required", "Current password is required to set a new password"),
            );
            return Err(errors);
        }
        self.email = self.email.map(|e| e.to_lowercase());
        self.avatar = self.avatar.normalize_blank();
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_user_hides_password_hash() {
        let now = Utc::now();
        let user = User {
            id: Uuid::nil(),
            name: "Admin".into(),
            email: "admin@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            role: UserRole::Admin,
            avatar: None,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_string(&PublicUser::from(user)).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains(r#""role":"admin""#));
    }

    #[test]
    fn new_password_requires_current_password() {
        let req = UpdateProfileRequest {
            new_password: Some("Sup3r$ecretPassw0rd!".into()),
            ..Default::default()
        };
        let errors = req.normalize().unwrap_err();
        assert!(errors.field_errors().contains_key("current_password"));
    }

    #[test]
    fn blank_name_is_rejected_after_trimming() {
        let req = RegisterRequest {
            name: "  A  ".into(),
            email: " Ada@Example.com ".into(),
            password: "Sup3r$ecretPassw0rd!".into(),
        };
        let errors = req.normalized().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));

        let req = RegisterRequest {
            name: " Ada ".into(),
            email: " Ada@Example.com ".into(),
            password: "Sup3r$ecretPassw0rd!".into(),
        }
        .normalized()
        .unwrap();
        assert_eq!(req.name, "Ada");
        assert_eq!(req.email, "ada@example.com");
    }

    #[test]
    fn weak_registration_password_is_rejected() {
        let req = RegisterRequest {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "password".into(),
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }
}
