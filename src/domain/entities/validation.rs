use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

use super::option_fields::OptionField;

pub const MIN_SLUG_LENGTH: u64 = 3;
pub const MAX_SLUG_LENGTH: u64 = 80;
pub const MAX_TAGS: usize = 20;
pub const MAX_TAG_LENGTH: usize = 40;

pub static SLUG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("slug pattern is valid")
});

// ───── Validation Helpers ───────────────────────────────────────────

/// Blank input means "no link" and is cleared later, so it passes here.
pub fn validate_http_url(url: &str) -> Result<(), ValidationError> {
    if url.trim().is_empty() {
        return Ok(());
    }
    match url::Url::parse(url) {
        Ok(parsed) => {
            if parsed.scheme() == "http" || parsed.scheme() == "https" {
                Ok(())
            } else {
                Err(new_validation_error("invalid_url_scheme", "URL must start with http:// or https://"))
            }
        }
        Err(_) => Err(new_validation_error("invalid_url", "Invalid URL format")),
    }
}

pub fn validate_optional_url_field(value: &OptionField<String>) -> Result<(), ValidationError> {
    if let OptionField::SetToValue(url) = value {
        validate_http_url(url)?;
    }
    Ok(())
}

pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if !SLUG_RE.is_match(slug) {
        return Err(new_validation_error(
            "slug_invalid",
            "Slug must contain only lowercase letters, digits, and single hyphens",
        ));
    }
    Ok(())
}

/// Tags, technologies and skills share one shape: a short list of short labels.
pub fn validate_labels(labels: &[String]) -> Result<(), ValidationError> {
    if labels.len() > MAX_TAGS {
        return Err(new_validation_error("too_many_labels", "Too many entries provided (max 20)"));
    }
    for label in labels {
        let trimmed = label.trim();
        if trimmed.is_empty() || trimmed.chars().count() > MAX_TAG_LENGTH {
            return Err(new_validation_error("invalid_label_length", "Each entry must be 1-40 characters"));
        }
    }
    Ok(())
}

/// Trims, drops empties and de-duplicates while keeping the first occurrence.
pub fn normalize_labels(labels: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(labels.len());
    for label in labels {
        let trimmed = label.trim();
        if !trimmed.is_empty() && !out.iter().any(|l| l.eq_ignore_ascii_case(trimmed)) {
            out.push(trimmed.to_string());
        }
    }
    out
}

/// Trims in place before validation so length rules measure what gets stored.
pub fn trim_field(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

pub fn trim_optional(value: &mut Option<String>) {
    if let Some(v) = value {
        trim_field(v);
    }
}

/// Blank optional strings are stored as NULL.
pub fn blank_to_none(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub fn new_validation_error(code: &'static str, msg: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(msg));
    err
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_are_lowercase_hyphenated() {
        assert!(validate_slug("rust-portfolio-2024").is_ok());
        assert!(validate_slug("Rust").is_err());
        assert!(validate_slug("-edge").is_err());
        assert!(validate_slug("double--hyphen").is_err());
    }

    #[test]
    fn only_http_urls_pass() {
        assert!(validate_http_url("https://github.com/me/repo").is_ok());
        assert!(validate_http_url("javascript:alert(1)").is_err());
        assert!(validate_http_url("not a url").is_err());
        assert!(validate_http_url("").is_ok());
    }

    #[test]
    fn labels_are_bounded() {
        assert!(validate_labels(&["rust".into(), "actix".into()]).is_ok());
        assert!(validate_labels(&["".into()]).is_err());
        let many: Vec<String> = (0..21).map(|i| format!("t{i}")).collect();
        assert!(validate_labels(&many).is_err());
    }

    #[test]
    fn trim_field_strips_surrounding_whitespace() {
        let mut value = "  Portfolio  ".to_string();
        trim_field(&mut value);
        assert_eq!(value, "Portfolio");

        let mut blank = Some("   ".to_string());
        trim_optional(&mut blank);
        assert_eq!(blank.as_deref(), Some(""));
    }

    #[test]
    fn normalize_labels_trims_and_dedupes() {
        let labels = normalize_labels(vec![" Rust ".into(), "rust".into(), "".into(), "SQL".into()]);
        assert_eq!(labels, vec!["Rust".to_string(), "SQL".to_string()]);
    }
}
