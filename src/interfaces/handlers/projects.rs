use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entities::{
        envelope::{ApiResponse, ListQuery},
        project::{NewProjectRequest, UpdateProjectRequest},
    },
    errors::AppError,
    use_cases::extractors::{AdminClaims, OptionalClaims},
    AppState,
};

#[instrument(skip(claims, state, query))]
pub async fn list_projects(
    claims: OptionalClaims,
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<impl Responder, AppError> {
    let page = state
        .project_handler
        .list_projects(&query, claims.is_admin())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::from(page)))
}

#[instrument(skip(_claims, state, data))]
pub async fn create_project(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    data: web::Json<NewProjectRequest>,
) -> Result<impl Responder, AppError> {
    let project = state.project_handler.create_project(data.into_inner()).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(project).with_message("Project created")))
}

#[instrument(skip(claims, state))]
pub async fn get_project(
    claims: OptionalClaims,
    id_or_slug: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let project = state
        .project_handler
        .view_project(&id_or_slug, claims.is_admin())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(project)))
}

#[instrument(skip(_claims, state, data))]
pub async fn update_project(
    _claims: AdminClaims,
    project_id: web::Path<Uuid>,
    state: web::Data<AppState>,
    data: web::Json<UpdateProjectRequest>,
) -> Result<impl Responder, AppError> {
    let project = state
        .project_handler
        .update_project(project_id.into_inner(), data.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(project).with_message("Project updated")))
}

#[instrument(skip(_claims, state))]
pub async fn delete_project(
    _claims: AdminClaims,
    project_id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.project_handler.delete_project(project_id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Project deleted")))
}
