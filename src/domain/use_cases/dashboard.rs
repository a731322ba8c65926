use std::sync::Arc;

use crate::{
    entities::dashboard::DashboardStats,
    errors::AppError,
    repositories::{
        certification::CertificationRepository, contact::ContactRepository, experience::ExperienceRepository,
        post::PostRepository, project::ProjectRepository, testimonial::TestimonialRepository,
    },
};

const RECENT_CONTACTS: i64 = 5;

/// Read-only aggregate over every collection.
pub struct DashboardHandler {
    pub project_repo: Arc<dyn ProjectRepository>,
    pub post_repo: Arc<dyn PostRepository>,
    pub testimonial_repo: Arc<dyn TestimonialRepository>,
    pub experience_repo: Arc<dyn ExperienceRepository>,
    pub certification_repo: Arc<dyn CertificationRepository>,
    pub contact_repo: Arc<dyn ContactRepository>,
}

impl DashboardHandler {
    pub async fn stats(&self) -> Result<DashboardStats, AppError> {
        let (projects, posts, testimonials, experience, certifications, contacts) = futures::try_join!(
            self.project_repo.project_counts(),
            self.post_repo.post_counts(),
            self.testimonial_repo.testimonial_counts(),
            self.experience_repo.experience_counts(),
            self.certification_repo.certification_counts(),
            self.contact_repo.contact_counts(),
        )?;

        let (project_views, post_views, recent_contacts) = futures::try_join!(
            self.project_repo.total_project_views(),
            self.post_repo.total_post_views(),
            self.contact_repo.list_contacts(None, RECENT_CONTACTS, 0),
        )?;

        Ok(DashboardStats {
            projects,
            posts,
            testimonials,
            experience,
            certifications,
            contacts,
            total_views: project_views + post_views,
            recent_contacts,
        })
    }
}
