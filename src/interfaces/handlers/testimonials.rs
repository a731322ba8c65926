use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entities::{
        envelope::{ApiResponse, StatusQuery},
        testimonial::{NewTestimonialRequest, UpdateTestimonialRequest},
    },
    errors::AppError,
    use_cases::extractors::{AdminClaims, OptionalClaims},
    AppState,
};

#[instrument(skip(claims, state, query))]
pub async fn list_testimonials(
    claims: OptionalClaims,
    state: web::Data<AppState>,
    query: web::Query<StatusQuery>,
) -> Result<impl Responder, AppError> {
    let testimonials = state
        .testimonial_handler
        .list_testimonials(query.status, claims.is_admin())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(testimonials)))
}

#[instrument(skip(_claims, state, data))]
pub async fn create_testimonial(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    data: web::Json<NewTestimonialRequest>,
) -> Result<impl Responder, AppError> {
    let testimonial = state.testimonial_handler.create_testimonial(data.into_inner()).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(testimonial).with_message("Testimonial created")))
}

#[instrument(skip(claims, state))]
pub async fn get_testimonial(
    claims: OptionalClaims,
    testimonial_id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let testimonial = state
        .testimonial_handler
        .get_testimonial(testimonial_id.into_inner(), claims.is_admin())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(testimonial)))
}

#[instrument(skip(_claims, state, data))]
pub async fn update_testimonial(
    _claims: AdminClaims,
    testimonial_id: web::Path<Uuid>,
    state: web::Data<AppState>,
    data: web::Json<UpdateTestimonialRequest>,
) -> Result<impl Responder, AppError> {
    let testimonial = state
        .testimonial_handler
        .update_testimonial(testimonial_id.into_inner(), data.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(testimonial).with_message("Testimonial updated")))
}

#[instrument(skip(_claims, state))]
pub async fn delete_testimonial(
    _claims: AdminClaims,
    testimonial_id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.testimonial_handler.delete_testimonial(testimonial_id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Testimonial deleted")))
}
