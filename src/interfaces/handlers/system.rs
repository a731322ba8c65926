use actix_web::{web, HttpResponse, Responder};

use crate::{
    entities::envelope::ApiResponse,
    use_cases::system::DependencyStatus,
    AppState,
};

/// Status, uptime and dependency checks, cached for a few seconds.
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let database = async {
        match state.auth_handler.user_repo.check_connection().await {
            Ok(()) => DependencyStatus::Up,
            Err(_) => DependencyStatus::Down,
        }
    };
    let redis = async {
        match &state.redis {
            Some(redis) if redis.ping().await => DependencyStatus::Up,
            Some(_) => DependencyStatus::Down,
            None => DependencyStatus::NotConfigured,
        }
    };

    let report = state.health_monitor.report(database, redis).await;
    HttpResponse::Ok().json(ApiResponse::ok(report))
}
