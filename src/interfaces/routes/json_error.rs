use actix_web::{
    error::{JsonPayloadError, PathError, QueryPayloadError},
    web,
};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{to_camel_case, AppError};

const MAX_JSON_BYTES: usize = 1024 * 1024;

static MISSING_FIELD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"missing field `([A-Za-z0-9_]+)`").expect("missing field pattern is valid"));

/// Every malformed body, query string or path segment becomes a 400 in the
/// same `details` shape as schema validation.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(MAX_JSON_BYTES)
            .error_handler(|err, _req| json_error(err).into()),
    )
    .app_data(web::QueryConfig::default().error_handler(|err, _req| query_error(err).into()))
    .app_data(web::PathConfig::default().error_handler(|err, _req| path_error(err).into()));
}

pub fn json_error(err: JsonPayloadError) -> AppError {
    match err {
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            AppError::PayloadTooLarge("Request body is too large".into())
        }
        JsonPayloadError::ContentType => {
            AppError::UnsupportedMediaType("Content-Type must be application/json".into())
        }
        JsonPayloadError::Deserialize(e) => {
            let message = e.to_string();
            AppError::field(&field_from_message(&message, "body"), &message)
        }
        other => AppError::field("body", &other.to_string()),
    }
}

fn query_error(err: QueryPayloadError) -> AppError {
    let message = err.to_string();
    AppError::field(&field_from_message(&message, "query"), &message)
}

fn path_error(err: PathError) -> AppError {
    tracing::debug!("Rejected path parameter: {}", err);
    AppError::field("id", "Invalid identifier")
}

/// Pulls the field name out of serde's "missing field `x`" messages.
fn field_from_message(message: &str, fallback: &str) -> String {
    MISSING_FIELD_RE
        .captures(message)
        .and_then(|c| c.get(1))
        .map(|m| to_camel_case(m.as_str()))
        .unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_is_named_in_camel_case() {
        assert_eq!(field_from_message("missing field `start_date` at line 1", "body"), "startDate");
        assert_eq!(field_from_message("expected value at line 1 column 1", "body"), "body");
    }

    #[test]
    fn malformed_json_is_a_validation_error() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(json_error(JsonPayloadError::Deserialize(err)), AppError::ValidationError(_)));
    }
}
