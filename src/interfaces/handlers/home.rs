use actix_web::{web, HttpResponse, Responder};

use crate::{constants::API_VERSION, AppState};

pub async fn home(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": format!("Welcome to the {} portfolio API", state.config.owner_name),
        "name": state.config.name,
        "version": API_VERSION,
        "health": "/api/health"
    }))
}
