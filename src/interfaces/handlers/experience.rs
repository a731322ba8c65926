use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entities::{
        envelope::{ApiResponse, StatusQuery},
        experience::{NewExperienceRequest, UpdateExperienceRequest},
    },
    errors::AppError,
    use_cases::extractors::{AdminClaims, OptionalClaims},
    AppState,
};

#[instrument(skip(claims, state, query))]
pub async fn list_experiences(
    claims: OptionalClaims,
    state: web::Data<AppState>,
    query: web::Query<StatusQuery>,
) -> Result<impl Responder, AppError> {
    let experiences = state
        .experience_handler
        .list_experiences(query.status, claims.is_admin())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(experiences)))
}

#[instrument(skip(_claims, state, data))]
pub async fn create_experience(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    data: web::Json<NewExperienceRequest>,
) -> Result<impl Responder, AppError> {
    let experience = state.experience_handler.create_experience(data.into_inner()).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(experience).with_message("Experience entry created")))
}

#[instrument(skip(claims, state))]
pub async fn get_experience(
    claims: OptionalClaims,
    experience_id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let experience = state
        .experience_handler
        .get_experience(experience_id.into_inner(), claims.is_admin())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(experience)))
}

#[instrument(skip(_claims, state, data))]
pub async fn update_experience(
    _claims: AdminClaims,
    experience_id: web::Path<Uuid>,
    state: web::Data<AppState>,
    data: web::Json<UpdateExperienceRequest>,
) -> Result<impl Responder, AppError> {
    let experience = state
        .experience_handler
        .update_experience(experience_id.into_inner(), data.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(experience).with_message("Experience entry updated")))
}

#[instrument(skip(_claims, state))]
pub async fn delete_experience(
    _claims: AdminClaims,
    experience_id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.experience_handler.delete_experience(experience_id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Experience entry deleted")))
}
