use std::time::Duration;

use reqwest::Client;
use serde::Serialize;

use crate::{errors::AppError, settings::AppConfig};

#[derive(Debug, Serialize)]
struct OutgoingEmail<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

/// Sends plain-text mail through an HTTP mail API (Resend-style JSON body,
/// bearer key).
#[derive(Clone)]
pub struct Mailer {
    client: Client,
    endpoint: String,
    api_key: String,
    from: String,
}

impl Mailer {
    /// `None` unless endpoint, key and sender are all configured.
    pub fn from_config(config: &AppConfig) -> Option<Self> {
        if !config.mail_configured() {
            return None;
        }
        let client = Client::builder().timeout(Duration::from_secs(15)).build().ok()?;
        Some(Mailer {
            client,
            endpoint: config.mail_api_url.clone()?,
            api_key: config.mail_api_key.clone()?,
            from: config.mail_from.clone()?,
        })
    }

    #[tracing::instrument(skip(self, body), fields(to = %to))]
    pub async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), AppError> {
        let email = OutgoingEmail {
            from: &self.from,
            to: [to],
            subject,
            text: body,
            reply_to: Some(&self.from),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&email)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            tracing::error!(%status, %detail, "Mail API rejected message");
            return Err(AppError::ServiceUnavailable("Email delivery failed".into()));
        }

        tracing::info!("Reply email sent");
        Ok(())
    }
}
