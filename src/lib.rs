mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod shared_repos;

pub use domain::{entities, password, use_cases};
pub use interfaces::{handlers, middlewares, repositories, routes};
pub use infrastructure::{auth, cache, db, integrations, limiter, storage, utils};

use std::time::Duration;

use auth::jwt::JwtService;
use constants::HEALTH_CACHE_TTL_SECS;
use cache::redis_store::RedisStore;
use integrations::{ai_reply::ReplyDrafter, image_host::ImageHost, mailer::Mailer};
use limiter::rate_limiter::RateLimiterStore;
use settings::AppConfig;
use shared_repos::SharedRepositories;
use storage::resume_store::ResumeStore;
use use_cases::{
    auth::AuthHandler,
    certifications::CertificationHandler,
    contact::{ContactGuards, ContactHandler},
    dashboard::DashboardHandler,
    experience::ExperienceHandler,
    media::MediaHandler,
    posts::PostHandler,
    projects::ProjectHandler,
    system::HealthMonitor,
    testimonials::TestimonialHandler,
};

pub struct AppState {
    pub config: AppConfig,
    pub redis: Option<RedisStore>,
    pub auth_handler: AuthHandler,
    pub project_handler: ProjectHandler,
    pub post_handler: PostHandler,
    pub testimonial_handler: TestimonialHandler,
    pub experience_handler: ExperienceHandler,
    pub certification_handler: CertificationHandler,
    pub contact_handler: ContactHandler,
    pub dashboard_handler: DashboardHandler,
    pub media_handler: MediaHandler,
    pub health_monitor: HealthMonitor,
}

impl AppState {
    /// Wires every use case onto the given repositories. Redis is optional;
    /// without it tokens cannot be revoked and only the per-IP contact
    /// limit applies.
    pub fn new(config: AppConfig, repos: SharedRepositories, redis: Option<RedisStore>) -> Self {
        let jwt_service = JwtService::new(&config);

        let auth_handler = AuthHandler::new(
            repos.user_repo.clone(),
            jwt_service,
            redis.clone(),
            RateLimiterStore::per_minute(config.login_limit_per_minute),
            config.allow_registration,
        );

        let contact_handler = ContactHandler::new(
            repos.contact_repo.clone(),
            ContactGuards {
                ip_limiter: RateLimiterStore::per_hour(config.contact_ip_limit_per_hour),
                redis: redis.clone(),
                email_limit_per_hour: config.contact_email_limit_per_hour,
            },
            Mailer::from_config(&config),
            ReplyDrafter::from_config(&config),
        );

        let dashboard_handler = DashboardHandler {
            project_repo: repos.project_repo.clone(),
            post_repo: repos.post_repo.clone(),
            testimonial_repo: repos.testimonial_repo.clone(),
            experience_repo: repos.experience_repo.clone(),
            certification_repo: repos.certification_repo.clone(),
            contact_repo: repos.contact_repo.clone(),
        };

        let media_handler = MediaHandler::new(
            ImageHost::from_config(&config),
            ResumeStore::new(&config.resume_dir),
            config.max_upload_bytes,
        );

        AppState {
            auth_handler,
            project_handler: ProjectHandler::new(repos.project_repo),
            post_handler: PostHandler::new(repos.post_repo),
            testimonial_handler: TestimonialHandler::new(repos.testimonial_repo),
            experience_handler: ExperienceHandler::new(repos.experience_repo),
            certification_handler: CertificationHandler::new(repos.certification_repo),
            contact_handler,
            dashboard_handler,
            media_handler,
            health_monitor: HealthMonitor::new(Duration::from_secs(HEALTH_CACHE_TTL_SECS)),
            redis,
            config,
        }
    }

    /// Opens the Redis pool when a URL is configured. A bad URL is logged and
    /// the API runs without Redis.
    pub fn connect_redis(config: &AppConfig) -> Option<RedisStore> {
        let url = config.redis_url.as_deref().filter(|u| !u.trim().is_empty())?;
        RedisStore::connect(url)
            .map_err(|e| tracing::error!("Redis connection error: {}", e))
            .ok()
    }
}
