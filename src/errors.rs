use std::borrow::Cow;
use std::fmt;

use actix_multipart::MultipartError;
use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse
};
use jsonwebtoken::errors::{ErrorKind, Error as JwtError};
use derive_more::Display;
use serde::Serialize;
use validator::{ValidationErrors, ValidationErrorsKind};

#[derive(Debug)]
pub enum AppError {
    ValidationError(Vec<FieldError>),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Auth(AuthError),
    PayloadTooLarge(String),
    UnsupportedMediaType(String),
    TooManyRequests(Option<u64>),
    ServiceUnavailable(String),
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationError(errors) => {
                let messages = errors.iter()
                    .map(|e| format!("{}:{}", e.field, e.message))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "validation error: {}", messages)
            }
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::NotFound(msg) => write!(f, "{}", msg),
            AppError::Conflict(msg) => write!(f, "{}", msg),
            AppError::Auth(err) => write!(f, "{}", err),
            AppError::PayloadTooLarge(msg) => write!(f, "{}", msg),
            AppError::UnsupportedMediaType(msg) => write!(f, "{}", msg),
            AppError::TooManyRequests(_) => write!(f, "Too many requests, please try again later"),
            AppError::ServiceUnavailable(msg) => write!(f, "{}", msg),
            AppError::InternalError(msg) => write!(f, "Internal server error: {}", msg)
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        if let AppError::Auth(err) = self {
            return err.error_response();
        }

        let body = match self {
            AppError::ValidationError(errors) => {
                serde_json::json!({
                    "success": false,
                    "error": "Validation failed",
                    "details": errors
                })
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                serde_json::json!({
                    "success": false,
                    "error": "Internal server error"
                })
            }
            _ => {
                serde_json::json!({"success": false, "error": self.to_string()})
            }
        };

        let mut builder = HttpResponse::build(self.status_code());
        if let AppError::TooManyRequests(Some(secs)) = self {
            builder.insert_header(("Retry-After", secs.to_string()));
        }
        builder
            .insert_header(ContentType::json())
            .json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Auth(err) => err.status_code(),
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut field_errors = Vec::new();
        collect_field_errors(&errors, None, &mut field_errors);
        field_errors.sort_by(|a, b| a.field.cmp(&b.field));

        AppError::ValidationError(field_errors)
    }
}

fn collect_field_errors(errors: &ValidationErrors, prefix: Option<&str>, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let name = match prefix {
            Some(p) => format!("{}.{}", p, to_camel_case(field)),
            None => to_camel_case(field),
        };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                out.extend(errs.iter().map(|e| FieldError {
                    field: name.clone(),
                    message: e
                        .message
                        .as_ref()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "Invalid value".to_string()),
                }));
            }
            ValidationErrorsKind::Struct(nested) => collect_field_errors(nested, Some(&name), out),
            ValidationErrorsKind::List(items) => {
                for (idx, nested) in items {
                    collect_field_errors(nested, Some(&format!("{}[{}]", name, idx)), out);
                }
            }
        }
    }
}

/// `cover_image` -> `coverImage`, matching the JSON names clients send.
pub fn to_camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for c in field.chars() {
        if c == '_' {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

impl AppError {
    pub fn field(field: &str, message: &str) -> Self {
        AppError::ValidationError(vec![FieldError {
            field: field.to_string(),
            message: message.to_string(),
        }])
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Document not found".into()),
            sqlx::Error::Database(e) if e.code() == Some(Cow::Borrowed("23505")) => {
                AppError::Conflict("A document with the same unique value already exists".into())
            }
            sqlx::Error::Database(e) if e.code() == Some(Cow::Borrowed("23514")) => {
                AppError::BadRequest("Value violates a database constraint".into())
            }
            _ => AppError::InternalError(format!("Database error: {}", err))
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalError(err.to_string())
    }
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        AppError::InternalError(err.to_string())
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Auth(err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(format!("IO error: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::InternalError(format!("Upstream request failed: {}", err))
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        match err {
            MultipartError::ContentTypeIncompatible | MultipartError::ContentTypeMissing => {
                AppError::UnsupportedMediaType("Request must be multipart/form-data".to_string())
            }
            MultipartError::Payload(_) => {
                AppError::PayloadTooLarge("File too large".to_string())
            }
            _ => AppError::BadRequest(err.to_string()),
        }
    }
}

#[derive(Debug, Display)]
pub enum AuthError {
    #[display("Invalid token")]
    InvalidToken,

    #[display("Wrong credentials")]
    WrongCredentials,

    #[display("Token creation error")]
    TokenCreation,

    #[display("Token has expired")]
    TokenExpired,

    #[display("Missing credentials")]
    MissingCredentials,

    #[display("Forbidden: {_0}")]
    Forbidden(String),

    #[display("Registration is closed")]
    RegistrationClosed,

    #[display("Token revoked")]
    TokenRevoked,

    #[display("Redis connection failed: {_0}")]
    RedisConnection(String),

    #[display("Redis operation failed: {_0}")]
    RedisOperation(String),
}

impl ResponseError for AuthError {
    fn error_response(&self) -> HttpResponse {
        let error_message = match self {
            AuthError::Forbidden(msg) => msg.clone(),
            AuthError::RedisConnection(_) | AuthError::RedisOperation(_) | AuthError::TokenCreation => {
                tracing::error!("Auth infrastructure error: {}", self);
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        };
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({"success": false, "error": error_message}))
    }

    fn status_code(&self) -> StatusCode {
        match *self {
            AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::WrongCredentials => StatusCode::UNAUTHORIZED,
            AuthError::TokenCreation => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::TokenExpired => StatusCode::UNAUTHORIZED,
            AuthError::MissingCredentials => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden(_) => StatusCode::FORBIDDEN,
            AuthError::RegistrationClosed => StatusCode::FORBIDDEN,
            AuthError::TokenRevoked => StatusCode::UNAUTHORIZED,
            AuthError::RedisConnection(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::RedisOperation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JwtError> for AuthError {
    fn from(e: JwtError) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        }
    }
}

#[derive(Debug, Display)]
pub enum PasswordError {
    #[display("Invalid password parameters: {_0}")]
    InvalidParameters(String),

    #[display("Password hashing failed: {_0}")]
    HashingError(String),

    #[display("Invalid password hash format: {_0}")]
    InvalidHashFormat(String),

    #[display("Password verification failed: {_0}")]
    VerificationError(String),
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}
