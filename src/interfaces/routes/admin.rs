use actix_web::web;

use crate::handlers::{dashboard, media, system};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/dashboard", web::get().to(dashboard::dashboard_stats))
        .route("/health", web::get().to(system::health_check))
        .route("/upload", web::post().to(media::upload_image))
        .service(
            web::resource("/resume")
                .route(web::get().to(media::get_resume))
                .route(web::post().to(media::upload_resume))
                .route(web::delete().to(media::delete_resume))
        );
}
