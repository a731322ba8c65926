use actix_multipart::Multipart;
use actix_web::{
    http::header::{ContentDisposition, DispositionParam, DispositionType},
    web, HttpResponse, Responder,
};
use futures_util::StreamExt;
use serde::Deserialize;
use tracing::instrument;

use crate::{entities::envelope::ApiResponse, errors::AppError, use_cases::extractors::AdminClaims, AppState};

const FILE_FIELD: &str = "file";

#[derive(Debug, Default, Deserialize)]
pub struct ResumeQuery {
    #[serde(default)]
    pub download: bool,
}

/// Reads the `file` field of a multipart body, giving up as soon as it
/// grows past `max_bytes`. Other fields are drained and ignored.
async fn read_file_field(mut payload: Multipart, max_bytes: usize) -> Result<(Vec<u8>, Option<String>), AppError> {
    while let Some(field) = payload.next().await {
        let mut field = field?;
        if field.name() != Some(FILE_FIELD) {
            while let Some(chunk) = field.next().await {
                chunk?;
            }
            continue;
        }

        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk?;
            if bytes.len() + chunk.len() > max_bytes {
                return Err(AppError::PayloadTooLarge(format!("File exceeds the {max_bytes} byte limit")));
            }
            bytes.extend_from_slice(&chunk);
        }
        return Ok((bytes, file_name));
    }

    Err(AppError::field(FILE_FIELD, "File is required"))
}

#[instrument(skip(_claims, state, payload))]
pub async fn upload_image(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<impl Responder, AppError> {
    let (bytes, file_name) = read_file_field(payload, state.media_handler.max_upload_bytes).await?;
    let image = state.media_handler.upload_image(bytes, file_name).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(image).with_message("Image uploaded")))
}

#[instrument(skip(state))]
pub async fn get_resume(
    state: web::Data<AppState>,
    query: web::Query<ResumeQuery>,
) -> Result<impl Responder, AppError> {
    let bytes = state.media_handler.resume().await?;

    let disposition = ContentDisposition {
        disposition: if query.download {
            DispositionType::Attachment
        } else {
            DispositionType::Inline
        },
        parameters: vec![DispositionParam::Filename(state.media_handler.resume_file_name().to_string())],
    };

    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header(disposition)
        .body(bytes))
}

#[instrument(skip(_claims, state, payload))]
pub async fn upload_resume(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<impl Responder, AppError> {
    let (bytes, _) = read_file_field(payload, state.media_handler.max_upload_bytes).await?;
    let info = state.media_handler.replace_resume(bytes).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(info).with_message("Resume uploaded")))
}

#[instrument(skip(_claims, state))]
pub async fn delete_resume(_claims: AdminClaims, state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    state.media_handler.delete_resume().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Resume deleted")))
}
