use crate::{
    errors::AppError,
    integrations::image_host::{ImageHost, UploadedImage},
    storage::resume_store::{ResumeInfo, ResumeStore},
};

const PDF_MIME: &str = "application/pdf";

/// Image uploads and the single stored resume. Bytes arrive already read
/// from the multipart body; this layer sniffs and routes them.
pub struct MediaHandler {
    pub image_host: Option<ImageHost>,
    pub resume_store: ResumeStore,
    pub max_upload_bytes: usize,
}

impl MediaHandler {
    pub fn new(image_host: Option<ImageHost>, resume_store: ResumeStore, max_upload_bytes: usize) -> Self {
        MediaHandler {
            image_host,
            resume_store,
            max_upload_bytes,
        }
    }

    pub async fn upload_image(&self, bytes: Vec<u8>, file_name: Option<String>) -> Result<UploadedImage, AppError> {
        let host = self
            .image_host
            .as_ref()
            .ok_or_else(|| AppError::ServiceUnavailable("Image uploads are not configured".into()))?;

        self.check_size(&bytes)?;
        let mime = sniff(&bytes)
            .filter(|mime| mime.starts_with("image/"))
            .ok_or_else(|| AppError::UnsupportedMediaType("Only image files are allowed".into()))?;

        let file_name = file_name.unwrap_or_else(|| "upload".to_string());
        host.upload(bytes, file_name, mime).await
    }

    pub async fn replace_resume(&self, bytes: Vec<u8>) -> Result<ResumeInfo, AppError> {
        self.check_size(&bytes)?;
        if sniff(&bytes) != Some(PDF_MIME) {
            return Err(AppError::UnsupportedMediaType("Resume must be a PDF".into()));
        }
        self.resume_store.replace(&bytes).await
    }

    pub async fn resume(&self) -> Result<Vec<u8>, AppError> {
        self.resume_store
            .read()
            .await?
            .ok_or_else(|| AppError::NotFound("No resume uploaded".into()))
    }

    pub fn resume_file_name(&self) -> &'static str {
        self.resume_store.file_name()
    }

    pub async fn delete_resume(&self) -> Result<(), AppError> {
        match self.resume_store.delete().await? {
            true => Ok(()),
            false => Err(AppError::NotFound("No resume uploaded".into())),
        }
    }

    fn check_size(&self, bytes: &[u8]) -> Result<(), AppError> {
        if bytes.is_empty() {
            return Err(AppError::field("file", "File is required"));
        }
        if bytes.len() > self.max_upload_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "File exceeds the {} byte limit",
                self.max_upload_bytes
            )));
        }
        Ok(())
    }
}

fn sniff(bytes: &[u8]) -> Option<&'static str> {
    infer::get(bytes).map(|kind| kind.mime_type())
}
