use actix_web::{web, HttpRequest, HttpResponse, Responder};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entities::{
        contact::{
            BulkContactRequest, ContactForm, ContactListQuery, ContactReceipt, GenerateReplyRequest, ReplyRequest,
            UpdateContactStatusRequest,
        },
        envelope::ApiResponse,
    },
    errors::AppError,
    use_cases::extractors::AdminClaims,
    utils::get_client_ip::get_client_ip,
    AppState,
};

#[instrument(skip(req, state, form))]
pub async fn submit_contact(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: web::Json<ContactForm>,
) -> Result<impl Responder, AppError> {
    let client_ip = get_client_ip(&req, state.config.trust_x_forwarded_for);
    let contact = state.contact_handler.submit(form.into_inner(), &client_ip).await?;

    Ok(HttpResponse::Created().json(
        ApiResponse::ok(ContactReceipt { id: contact.id })
            .with_message("Thank you for your message! I'll get back to you soon."),
    ))
}

#[instrument(skip(_claims, state, query))]
pub async fn list_contacts(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    query: web::Query<ContactListQuery>,
) -> Result<impl Responder, AppError> {
    let (page, unread) = state.contact_handler.list(&query).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::from(page).with_message(format!("{unread} unread"))))
}

#[instrument(skip(_claims, state))]
pub async fn get_contact(
    _claims: AdminClaims,
    contact_id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let contact = state.contact_handler.get(contact_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(contact)))
}

#[instrument(skip(_claims, state, data))]
pub async fn update_contact_status(
    _claims: AdminClaims,
    contact_id: web::Path<Uuid>,
    state: web::Data<AppState>,
    data: web::Json<UpdateContactStatusRequest>,
) -> Result<impl Responder, AppError> {
    let contact = state
        .contact_handler
        .update_status(contact_id.into_inner(), data.status)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(contact).with_message("Status updated")))
}

#[instrument(skip(_claims, state))]
pub async fn delete_contact(
    _claims: AdminClaims,
    contact_id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.contact_handler.delete(contact_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Message deleted")))
}

#[instrument(skip(_claims, state, data))]
pub async fn bulk_contacts(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    data: web::Json<BulkContactRequest>,
) -> Result<impl Responder, AppError> {
    let result = state.contact_handler.bulk(data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(result)))
}

#[instrument(skip(_claims, state, data))]
pub async fn reply_to_contact(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    data: web::Json<ReplyRequest>,
) -> Result<impl Responder, AppError> {
    let contact = state.contact_handler.reply(data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(contact).with_message("Reply sent")))
}

#[instrument(skip(_claims, state, data))]
pub async fn generate_ai_reply(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    data: web::Json<GenerateReplyRequest>,
) -> Result<impl Responder, AppError> {
    let draft = state.contact_handler.generate_reply(data.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(draft)))
}
