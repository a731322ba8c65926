use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entities::{
        envelope::{ApiResponse, ListQuery},
        post::{NewPostRequest, UpdatePostRequest},
    },
    errors::AppError,
    use_cases::extractors::{AdminClaims, OptionalClaims},
    AppState,
};

#[instrument(skip(claims, state, query))]
pub async fn list_posts(
    claims: OptionalClaims,
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<impl Responder, AppError> {
    let page = state
        .post_handler
        .list_posts(&query, claims.is_admin())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::from(page)))
}

#[instrument(skip(_claims, state, data))]
pub async fn create_post(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    data: web::Json<NewPostRequest>,
) -> Result<impl Responder, AppError> {
    let post = state.post_handler.create_post(data.into_inner()).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(post).with_message("Post created")))
}

#[instrument(skip(claims, state))]
pub async fn get_post(
    claims: OptionalClaims,
    id_or_slug: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let post = state
        .post_handler
        .view_post(&id_or_slug, claims.is_admin())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

#[instrument(skip(_claims, state, data))]
pub async fn update_post(
    _claims: AdminClaims,
    post_id: web::Path<Uuid>,
    state: web::Data<AppState>,
    data: web::Json<UpdatePostRequest>,
) -> Result<impl Responder, AppError> {
    let post = state
        .post_handler
        .update_post(post_id.into_inner(), data.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post).with_message("Post updated")))
}

#[instrument(skip(_claims, state))]
pub async fn delete_post(
    _claims: AdminClaims,
    post_id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.post_handler.delete_post(post_id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Post deleted")))
}
