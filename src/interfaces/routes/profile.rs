use actix_web::web;

use crate::handlers::{certifications, experience, testimonials};

/// Unpaginated collections: testimonials, experience and certifications.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/testimonials")
            .service(
                web::resource("")
                    .route(web::get().to(testimonials::list_testimonials))
                    .route(web::post().to(testimonials::create_testimonial))
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(testimonials::get_testimonial))
                    .route(web::put().to(testimonials::update_testimonial))
                    .route(web::delete().to(testimonials::delete_testimonial))
            )
    );

    cfg.service(
        web::scope("/experience")
            .service(
                web::resource("")
                    .route(web::get().to(experience::list_experiences))
                    .route(web::post().to(experience::create_experience))
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(experience::get_experience))
                    .route(web::put().to(experience::update_experience))
                    .route(web::delete().to(experience::delete_experience))
            )
    );

    cfg.service(
        web::scope("/certifications")
            .service(
                web::resource("")
                    .route(web::get().to(certifications::list_certifications))
                    .route(web::post().to(certifications::create_certification))
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(certifications::get_certification))
                    .route(web::put().to(certifications::update_certification))
                    .route(web::delete().to(certifications::delete_certification))
            )
    );
}
