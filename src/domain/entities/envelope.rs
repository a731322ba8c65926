use serde::{Deserialize, Serialize};

use super::status::StatusFilter;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// `{ success, data, message, pagination }` wrapper returned by every endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            message: None,
            pagination: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        ApiResponse {
            success: true,
            data: None,
            message: Some(message.into()),
            pagination: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: i64) -> Self {
        let limit_i = i64::from(limit.max(1));
        Pagination {
            page,
            limit,
            total,
            total_pages: (total + limit_i - 1) / limit_i,
        }
    }
}

/// A page of documents plus the total matching count.
#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T: Serialize> From<Page<T>> for ApiResponse<Vec<T>> {
    fn from(page: Page<T>) -> Self {
        ApiResponse::ok(page.items).with_pagination(page.pagination)
    }
}

/// Query string shared by the content list endpoints.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub status: Option<StatusFilter>,
    pub featured: Option<bool>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub q: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ListQuery {
    pub fn page(&self) -> u32 {
        self.page.filter(|p| *p > 0).unwrap_or(1)
    }

    pub fn limit(&self) -> u32 {
        self.limit
            .filter(|l| *l > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page() - 1) * i64::from(self.limit())
    }

    /// Trimmed search term, `None` when blank.
    pub fn search(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// `?status=` on the unpaginated collections.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StatusQuery {
    pub status: Option<StatusFilter>,
}

/// Resolved list filter handed to repositories.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListFilter {
    pub status: Option<super::status::ContentStatus>,
    pub featured: Option<bool>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub search: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

impl ListQuery {
    /// Applies visibility rules: non-admins only ever see published documents.
    pub fn to_filter(&self, is_admin: bool) -> ListFilter {
        ListFilter {
            status: StatusFilter::resolve(self.status, is_admin),
            featured: self.featured,
            category: self.category.as_deref().map(str::trim).filter(|c| !c.is_empty()).map(str::to_string),
            tag: self.tag.as_deref().map(str::trim).filter(|t| !t.is_empty()).map(str::to_string),
            search: self.search().map(str::to_string),
            limit: i64::from(self.limit()),
            offset: self.offset(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_rounds_total_pages_up() {
        assert_eq!(Pagination::new(1, 10, 0).total_pages, 0);
        assert_eq!(Pagination::new(1, 10, 10).total_pages, 1);
        assert_eq!(Pagination::new(2, 10, 11).total_pages, 2);
    }

    #[test]
    fn list_query_clamps_page_and_limit() {
        let query = ListQuery { page: Some(0), limit: Some(500), ..Default::default() };
        assert_eq!(query.page(), 1);
        assert_eq!(query.limit(), MAX_PAGE_SIZE);
        assert_eq!(query.offset(), 0);

        let query = ListQuery { page: Some(3), limit: Some(20), ..Default::default() };
        assert_eq!(query.offset(), 40);
    }

    #[test]
    fn envelope_omits_empty_fields() {
        let body = serde_json::to_value(ApiResponse::message("done")).unwrap();
        assert_eq!(body, serde_json::json!({"success": true, "message": "done"}));
    }

    #[test]
    fn blank_search_is_ignored() {
        let query = ListQuery { q: Some("   ".into()), ..Default::default() };
        assert_eq!(query.search(), None);
    }

    #[test]
    fn public_filter_is_pinned_to_published() {
        use super::super::status::ContentStatus;

        let query = ListQuery { status: Some(StatusFilter::Draft), tag: Some(" rust ".into()), ..Default::default() };
        let public = query.to_filter(false);
        assert_eq!(public.status, Some(ContentStatus::Published));
        assert_eq!(public.tag.as_deref(), Some("rust"));

        let admin = query.to_filter(true);
        assert_eq!(admin.status, Some(ContentStatus::Draft));
    }
}
