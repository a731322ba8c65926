use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{entities::envelope::ApiResponse, errors::AppError, use_cases::extractors::AdminClaims, AppState};

#[instrument(skip(_claims, state))]
pub async fn dashboard_stats(_claims: AdminClaims, state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let stats = state.dashboard_handler.stats().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(stats)))
}
