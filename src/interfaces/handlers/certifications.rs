use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entities::{
        certification::{NewCertificationRequest, UpdateCertificationRequest},
        envelope::{ApiResponse, StatusQuery},
    },
    errors::AppError,
    use_cases::extractors::{AdminClaims, OptionalClaims},
    AppState,
};

#[instrument(skip(claims, state, query))]
pub async fn list_certifications(
    claims: OptionalClaims,
    state: web::Data<AppState>,
    query: web::Query<StatusQuery>,
) -> Result<impl Responder, AppError> {
    let certifications = state
        .certification_handler
        .list_certifications(query.status, claims.is_admin())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(certifications)))
}

#[instrument(skip(_claims, state, data))]
pub async fn create_certification(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    data: web::Json<NewCertificationRequest>,
) -> Result<impl Responder, AppError> {
    let certification = state.certification_handler.create_certification(data.into_inner()).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(certification).with_message("Certification created")))
}

#[instrument(skip(claims, state))]
pub async fn get_certification(
    claims: OptionalClaims,
    certification_id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let certification = state
        .certification_handler
        .get_certification(certification_id.into_inner(), claims.is_admin())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(certification)))
}

#[instrument(skip(_claims, state, data))]
pub async fn update_certification(
    _claims: AdminClaims,
    certification_id: web::Path<Uuid>,
    state: web::Data<AppState>,
    data: web::Json<UpdateCertificationRequest>,
) -> Result<impl Responder, AppError> {
    let certification = state
        .certification_handler
        .update_certification(certification_id.into_inner(), data.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(certification).with_message("Certification updated")))
}

#[instrument(skip(_claims, state))]
pub async fn delete_certification(
    _claims: AdminClaims,
    certification_id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.certification_handler.delete_certification(certification_id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Certification deleted")))
}
