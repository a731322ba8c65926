use actix_web::web;

use crate::handlers::home::home;

mod admin;
mod auth;
mod contact;
mod json_error;
mod profile;
mod projects;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home));

    cfg.service(
        web::scope("/api")
            .configure(auth::config_routes)
            .configure(projects::config_routes)
            .configure(profile::config_routes)
            .configure(contact::config_routes)
            .configure(admin::config_routes)
    );

    cfg.configure(json_error::config_routes);
}
