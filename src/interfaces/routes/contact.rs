use actix_web::web;

use crate::handlers::contact;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/contact")
            .service(
                web::resource("")
                    .route(web::post().to(contact::submit_contact))
                    .route(web::get().to(contact::list_contacts))
            )
            // Fixed segments before `/{id}` so they are not parsed as ids.
            .route("/bulk", web::post().to(contact::bulk_contacts))
            .route("/reply", web::post().to(contact::reply_to_contact))
            .route("/generate-ai-reply", web::post().to(contact::generate_ai_reply))
            .service(
                web::resource("/{id}")
                    .route(web::get().to(contact::get_contact))
                    .route(web::put().to(contact::update_contact_status))
                    .route(web::delete().to(contact::delete_contact))
            )
    );
}
