use uuid::Uuid;

use crate::errors::AppError;

/// Detail routes accept either the document id or its slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentKey {
    Id(Uuid),
    Slug(String),
}

impl DocumentKey {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(AppError::field("idOrSlug", "Identifier cannot be empty"));
        }
        Ok(match Uuid::parse_str(raw) {
            Ok(id) => DocumentKey::Id(id),
            Err(_) => DocumentKey::Slug(raw.to_lowercase()),
        })
    }
}
