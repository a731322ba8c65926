use std::sync::Arc;

use sqlx::PgPool;

use crate::repositories::{
    certification::CertificationRepository,
    contact::ContactRepository,
    experience::ExperienceRepository,
    post::PostRepository,
    project::ProjectRepository,
    sqlx_repo::{
        SqlxCertificationRepo, SqlxContactRepo, SqlxExperienceRepo, SqlxPostRepo, SqlxProjectRepo, SqlxTestimonialRepo,
        SqlxUserRepo,
    },
    testimonial::TestimonialRepository,
    user::UserRepository,
};

/// One handle per collection, shared by the use cases that read it.
#[derive(Clone)]
pub struct SharedRepositories {
    pub user_repo: Arc<dyn UserRepository>,
    pub project_repo: Arc<dyn ProjectRepository>,
    pub post_repo: Arc<dyn PostRepository>,
    pub testimonial_repo: Arc<dyn TestimonialRepository>,
    pub experience_repo: Arc<dyn ExperienceRepository>,
    pub certification_repo: Arc<dyn CertificationRepository>,
    pub contact_repo: Arc<dyn ContactRepository>,
}

impl SharedRepositories {
    pub fn new(pool: PgPool) -> Self {
        SharedRepositories {
            user_repo: Arc::new(SqlxUserRepo::new(pool.clone())),
            project_repo: Arc::new(SqlxProjectRepo::new(pool.clone())),
            post_repo: Arc::new(SqlxPostRepo::new(pool.clone())),
            testimonial_repo: Arc::new(SqlxTestimonialRepo::new(pool.clone())),
            experience_repo: Arc::new(SqlxExperienceRepo::new(pool.clone())),
            certification_repo: Arc::new(SqlxCertificationRepo::new(pool.clone())),
            contact_repo: Arc::new(SqlxContactRepo::new(pool)),
        }
    }
}
