use serde::Serialize;

use super::contact::Contact;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct StatusCounts {
    pub total: i64,
    pub published: i64,
    pub draft: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct ContactCounts {
    pub total: i64,
    pub unread: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub projects: StatusCounts,
    pub posts: StatusCounts,
    pub testimonials: StatusCounts,
    pub experience: StatusCounts,
    pub certifications: StatusCounts,
    pub contacts: ContactCounts,
    pub total_views: i64,
    pub recent_contacts: Vec<Contact>,
}
