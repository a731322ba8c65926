use std::time::Duration;

use reqwest::{multipart, Client};
use serde::{Deserialize, Serialize};

use crate::{errors::AppError, settings::AppConfig};

#[derive(Debug, Deserialize)]
struct HostResponse {
    data: Option<HostData>,
    success: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct HostData {
    url: String,
    delete_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_url: Option<String>,
}

/// ImgBB-compatible upload API: multipart `image` field, key in the query.
#[derive(Clone)]
pub struct ImageHost {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl ImageHost {
    pub fn from_config(config: &AppConfig) -> Option<Self> {
        let endpoint = config.image_host_url.clone().filter(|u| !u.trim().is_empty())?;
        let api_key = config.image_host_api_key.clone().filter(|k| !k.trim().is_empty())?;
        let client = Client::builder().timeout(Duration::from_secs(30)).build().ok()?;
        Some(ImageHost { client, endpoint, api_key })
    }

    #[tracing::instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload(&self, bytes: Vec<u8>, file_name: String, mime: &str) -> Result<UploadedImage, AppError> {
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime)
            .map_err(|e| AppError::BadRequest(format!("Invalid content type: {e}")))?;
        let form = multipart::Form::new().part("image", part);

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body: HostResponse = response.json().await?;
        match body.data {
            Some(data) if status.is_success() && body.success.unwrap_or(true) => Ok(UploadedImage {
                url: data.url,
                delete_url: data.delete_url,
            }),
            _ => {
                tracing::error!(%status, "Image host rejected upload");
                Err(AppError::ServiceUnavailable("Image upload failed".into()))
            }
        }
    }
}
