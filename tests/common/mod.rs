#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use mockall::mock;
use uuid::Uuid;

use portfolio_api::{
    auth::{jwt::JwtService, password::hash_password},
    entities::{
        certification::{Certification, CertificationInsert, UpdateCertificationRequest},
        contact::{BulkAction, Contact, ContactInsert, ContactStatus},
        dashboard::{ContactCounts, StatusCounts},
        envelope::ListFilter,
        experience::{Experience, ExperienceInsert, UpdateExperienceRequest},
        post::{Post, PostInsert, UpdatePostRequest},
        project::{Project, ProjectInsert, UpdateProjectRequest},
        status::ContentStatus,
        testimonial::{Testimonial, TestimonialInsert, UpdateTestimonialRequest},
        user::{User, UserChanges, UserInsert, UserRole},
    },
    errors::AppError,
    repositories::{
        certification::CertificationRepository, contact::ContactRepository, experience::ExperienceRepository,
        post::PostRepository, project::ProjectRepository, testimonial::TestimonialRepository, user::UserRepository,
    },
    settings::{AppConfig, AppEnvironment},
    shared_repos::SharedRepositories,
    utils::document_key::DocumentKey,
    AppState,
};

mock! {
    pub UserRepo {}
    #[async_trait]
    impl UserRepository for UserRepo {
        async fn check_connection(&self) -> Result<(), AppError>;
        async fn count_users(&self) -> Result<i64, AppError>;
        async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
        async fn get_user_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError>;
        async fn create_user(&self, user: &UserInsert) -> Result<User, AppError>;
        async fn update_user(&self, id: &Uuid, changes: UserChanges) -> Result<Option<User>, AppError>;
    }
}

mock! {
    pub ProjectRepo {}
    #[async_trait]
    impl ProjectRepository for ProjectRepo {
        async fn create_project(&self, project: &ProjectInsert) -> Result<Project, AppError>;
        async fn list_projects(&self, filter: &ListFilter) -> Result<Vec<Project>, AppError>;
        async fn count_projects(&self, filter: &ListFilter) -> Result<i64, AppError>;
        async fn view_project(&self, key: &DocumentKey, include_drafts: bool) -> Result<Option<Project>, AppError>;
        async fn update_project(&self, id: &Uuid, patch: UpdateProjectRequest) -> Result<Option<Project>, AppError>;
        async fn delete_project(&self, id: &Uuid) -> Result<bool, AppError>;
        async fn project_counts(&self) -> Result<StatusCounts, AppError>;
        async fn total_project_views(&self) -> Result<i64, AppError>;
    }
}

mock! {
    pub PostRepo {}
    #[async_trait]
    impl PostRepository for PostRepo {
        async fn create_post(&self, post: &PostInsert) -> Result<Post, AppError>;
        async fn list_posts(&self, filter: &ListFilter) -> Result<Vec<Post>, AppError>;
        async fn count_posts(&self, filter: &ListFilter) -> Result<i64, AppError>;
        async fn view_post(&self, key: &DocumentKey, include_drafts: bool) -> Result<Option<Post>, AppError>;
        async fn update_post(&self, id: &Uuid, patch: UpdatePostRequest) -> Result<Option<Post>, AppError>;
        async fn delete_post(&self, id: &Uuid) -> Result<bool, AppError>;
        async fn post_counts(&self) -> Result<StatusCounts, AppError>;
        async fn total_post_views(&self) -> Result<i64, AppError>;
    }
}

mock! {
    pub TestimonialRepo {}
    #[async_trait]
    impl TestimonialRepository for TestimonialRepo {
        async fn create_testimonial(&self, testimonial: &TestimonialInsert) -> Result<Testimonial, AppError>;
        async fn list_testimonials(&self, status: Option<ContentStatus>) -> Result<Vec<Testimonial>, AppError>;
        async fn get_testimonial(&self, id: &Uuid, include_drafts: bool) -> Result<Option<Testimonial>, AppError>;
        async fn update_testimonial(&self, id: &Uuid, patch: UpdateTestimonialRequest) -> Result<Option<Testimonial>, AppError>;
        async fn delete_testimonial(&self, id: &Uuid) -> Result<bool, AppError>;
        async fn testimonial_counts(&self) -> Result<StatusCounts, AppError>;
    }
}

mock! {
    pub ExperienceRepo {}
    #[async_trait]
    impl ExperienceRepository for ExperienceRepo {
        async fn create_experience(&self, experience: &ExperienceInsert) -> Result<Experience, AppError>;
        async fn list_experiences(&self, status: Option<ContentStatus>) -> Result<Vec<Experience>, AppError>;
        async fn get_experience(&self, id: &Uuid, include_drafts: bool) -> Result<Option<Experience>, AppError>;
        async fn update_experience(&self, id: &Uuid, patch: UpdateExperienceRequest) -> Result<Option<Experience>, AppError>;
        async fn delete_experience(&self, id: &Uuid) -> Result<bool, AppError>;
        async fn experience_counts(&self) -> Result<StatusCounts, AppError>;
    }
}

mock! {
    pub CertificationRepo {}
    #[async_trait]
    impl CertificationRepository for CertificationRepo {
        async fn create_certification(&self, certification: &CertificationInsert) -> Result<Certification, AppError>;
        async fn list_certifications(&self, status: Option<ContentStatus>) -> Result<Vec<Certification>, AppError>;
        async fn get_certification(&self, id: &Uuid, include_drafts: bool) -> Result<Option<Certification>, AppError>;
        async fn update_certification(&self, id: &Uuid, patch: UpdateCertificationRequest) -> Result<Option<Certification>, AppError>;
        async fn delete_certification(&self, id: &Uuid) -> Result<bool, AppError>;
        async fn certification_counts(&self) -> Result<StatusCounts, AppError>;
    }
}

mock! {
    pub ContactRepo {}
    #[async_trait]
    impl ContactRepository for ContactRepo {
        async fn create_contact(&self, contact: &ContactInsert) -> Result<Contact, AppError>;
        async fn list_contacts(&self, status: Option<ContactStatus>, limit: i64, offset: i64) -> Result<Vec<Contact>, AppError>;
        async fn count_contacts(&self, status: Option<ContactStatus>) -> Result<i64, AppError>;
        async fn get_contact(&self, id: &Uuid) -> Result<Option<Contact>, AppError>;
        async fn update_contact_status(&self, id: &Uuid, status: ContactStatus) -> Result<Option<Contact>, AppError>;
        async fn record_reply(&self, id: &Uuid, reply: &str) -> Result<Option<Contact>, AppError>;
        async fn delete_contact(&self, id: &Uuid) -> Result<bool, AppError>;
        async fn bulk_update(&self, ids: &[Uuid], action: BulkAction) -> Result<u64, AppError>;
        async fn contact_counts(&self) -> Result<ContactCounts, AppError>;
    }
}

/// Mocks handed to the app. Set expectations before calling `state()`.
#[derive(Default)]
pub struct Mocks {
    pub users: MockUserRepo,
    pub projects: MockProjectRepo,
    pub posts: MockPostRepo,
    pub testimonials: MockTestimonialRepo,
    pub experience: MockExperienceRepo,
    pub certifications: MockCertificationRepo,
    pub contacts: MockContactRepo,
}

impl Mocks {
    pub fn state(self) -> actix_web::web::Data<AppState> {
        self.state_with(test_config())
    }

    pub fn state_with(self, config: AppConfig) -> actix_web::web::Data<AppState> {
        let repos = SharedRepositories {
            user_repo: Arc::new(self.users),
            project_repo: Arc::new(self.projects),
            post_repo: Arc::new(self.posts),
            testimonial_repo: Arc::new(self.testimonials),
            experience_repo: Arc::new(self.experience),
            certification_repo: Arc::new(self.certifications),
            contact_repo: Arc::new(self.contacts),
        };
        actix_web::web::Data::new(AppState::new(config, repos, None))
    }
}

/// Builds the service the way `main` does, minus CORS and logging.
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($state.clone())
                .wrap(portfolio_api::middlewares::auth::AuthMiddleware)
                .wrap(actix_web::middleware::NormalizePath::trim())
                .configure(portfolio_api::routes::configure_routes),
        )
        .await
    };
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::for_tests(AppEnvironment::Testing);
    config.resume_dir = std::env::temp_dir()
        .join(format!("portfolio-api-test-{}", Uuid::new_v4()))
        .to_string_lossy()
        .into_owned();
    config
}

pub const PASSWORD: &str = "Tr0ub4dor&3-horse-Battery";

pub fn user(role: UserRole) -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        name: "Ada Lovelace".into(),
        email: "ada@example.com".into(),
        password_hash: hash_password(PASSWORD).expect("hashing works"),
        role,
        avatar: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn token_for(user: &User) -> String {
    JwtService::new(&test_config()).create_jwt(user).expect("token")
}

pub fn bearer(user: &User) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token_for(user)))
}

pub fn admin_bearer() -> (&'static str, String) {
    bearer(&user(UserRole::Admin))
}

pub fn project(status: ContentStatus) -> Project {
    let now = Utc::now();
    Project {
        id: Uuid::new_v4(),
        title: "Portfolio Engine".into(),
        slug: "portfolio-engine".into(),
        description: "A site that shows my work".into(),
        content: None,
        technologies: vec!["Rust".into()],
        category: None,
        image_url: None,
        github_url: None,
        live_url: None,
        featured: false,
        status,
        views: 0,
        display_order: 0,
        created_at: now,
        updated_at: now,
    }
}

pub fn project_from(insert: &ProjectInsert) -> Project {
    let now = Utc::now();
    Project {
        id: Uuid::new_v4(),
        title: insert.title.clone(),
        slug: insert.slug.clone(),
        description: insert.description.clone(),
        content: insert.content.clone(),
        technologies: insert.technologies.clone(),
        category: insert.category.clone(),
        image_url: insert.image_url.clone(),
        github_url: insert.github_url.clone(),
        live_url: insert.live_url.clone(),
        featured: insert.featured,
        status: insert.status,
        views: 0,
        display_order: insert.display_order,
        created_at: now,
        updated_at: now,
    }
}

pub fn post_from(insert: &PostInsert) -> Post {
    let now = Utc::now();
    Post {
        id: Uuid::new_v4(),
        title: insert.title.clone(),
        slug: insert.slug.clone(),
        excerpt: insert.excerpt.clone(),
        content: insert.content.clone(),
        cover_image: insert.cover_image.clone(),
        tags: insert.tags.clone(),
        author: insert.author.clone(),
        reading_time: insert.reading_time,
        status: insert.status,
        published_at: insert.published_at,
        views: 0,
        created_at: now,
        updated_at: now,
    }
}

pub fn experience_from(insert: &ExperienceInsert) -> Experience {
    let now = Utc::now();
    Experience {
        id: Uuid::new_v4(),
        company: insert.company.clone(),
        position: insert.position.clone(),
        location: insert.location.clone(),
        employment_type: insert.employment_type.clone(),
        start_date: insert.start_date,
        end_date: insert.end_date,
        is_current: insert.is_current,
        description: insert.description.clone(),
        achievements: insert.achievements.clone(),
        technologies: insert.technologies.clone(),
        status: insert.status,
        display_order: insert.display_order,
        created_at: now,
        updated_at: now,
    }
}

pub fn contact(status: ContactStatus) -> Contact {
    let now = Utc::now();
    Contact {
        id: Uuid::new_v4(),
        name: "Grace Hopper".into(),
        email: "grace@example.com".into(),
        subject: Some("Collaboration".into()),
        message: "Would love to work together on a compiler.".into(),
        status,
        reply: None,
        replied_at: None,
        ip_address: Some("127.0.0.1".into()),
        created_at: now - Duration::hours(1),
        updated_at: now,
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}
