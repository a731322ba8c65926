use serde::{Deserialize, Serialize};

/// Publication state shared by every content collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "content_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    #[default]
    Draft,
    Published,
}

impl ContentStatus {
    pub fn is_published(&self) -> bool {
        matches!(self, ContentStatus::Published)
    }
}

/// Status filter accepted by list endpoints. `all` is only honoured for admins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    Draft,
    Published,
    All,
}

impl StatusFilter {
    /// Resolves the filter a caller is allowed to apply.
    /// Non-admins are pinned to published documents whatever they ask for.
    pub fn resolve(requested: Option<StatusFilter>, is_admin: bool) -> Option<ContentStatus> {
        if !is_admin {
            return Some(ContentStatus::Published);
        }
        match requested.unwrap_or(StatusFilter::All) {
            StatusFilter::Draft => Some(ContentStatus::Draft),
            StatusFilter::Published => Some(ContentStatus::Published),
            StatusFilter::All => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_callers_only_see_published() {
        assert_eq!(StatusFilter::resolve(Some(StatusFilter::Draft), false), Some(ContentStatus::Published));
        assert_eq!(StatusFilter::resolve(None, false), Some(ContentStatus::Published));
    }

    #[test]
    fn admins_default_to_everything() {
        assert_eq!(StatusFilter::resolve(None, true), None);
        assert_eq!(StatusFilter::resolve(Some(StatusFilter::Draft), true), Some(ContentStatus::Draft));
    }
}
