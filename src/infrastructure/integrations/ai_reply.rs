use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{entities::contact::Contact, settings::AppConfig};

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Clone)]
struct Endpoint {
    url: String,
    api_key: String,
    model: String,
}

/// Drafts replies to contact messages through an OpenAI-compatible
/// chat-completions endpoint. Falls back to a fixed template when the
/// endpoint is unset or fails.
#[derive(Clone)]
pub struct ReplyDrafter {
    client: Client,
    endpoint: Option<Endpoint>,
    owner_name: String,
}

impl ReplyDrafter {
    pub fn from_config(config: &AppConfig) -> Self {
        let endpoint = match (&config.ai_api_url, &config.ai_api_key) {
            (Some(url), Some(key)) if !url.trim().is_empty() && !key.trim().is_empty() => Some(Endpoint {
                url: url.clone(),
                api_key: key.clone(),
                model: config.ai_model.clone(),
            }),
            _ => None,
        };
        ReplyDrafter {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            endpoint,
            owner_name: config.owner_name.clone(),
        }
    }

    /// Returns the draft and whether it came from the model.
    pub async fn draft(&self, contact: &Contact) -> (String, bool) {
        let Some(endpoint) = &self.endpoint else {
            return (self.template_reply(contact), false);
        };

        match self.ask_model(endpoint, contact).await {
            Ok(reply) => (reply, true),
            Err(e) => {
                tracing::warn!("AI reply generation failed, using template: {}", e);
                (self.template_reply(contact), false)
            }
        }
    }

    async fn ask_model(&self, endpoint: &Endpoint, contact: &Contact) -> anyhow::Result<String> {
        let system = format!(
            "You write short, friendly, professional email replies on behalf of {}. \
             Reply in plain text without a subject line and sign off with their name.",
            self.owner_name
        );
        let user = format!(
            "Sender: {}\nSubject: {}\n\n{}",
            contact.name,
            contact.subject.as_deref().unwrap_or("(none)"),
            contact.message
        );
        let request = ChatRequest {
            model: &endpoint.model,
            messages: vec![
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: user },
            ],
            temperature: 0.7,
            max_tokens: 500,
        };

        let response: ChatResponse = self
            .client
            .post(&endpoint.url)
            .bearer_auth(&endpoint.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response
            .choices
            .into_iter()
            .find_map(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| anyhow::anyhow!("model returned no content"))
    }

    pub fn template_reply(&self, contact: &Contact) -> String {
        let topic = contact
            .subject
            .as_deref()
            .map(|s| format!(" about \"{s}\""))
            .unwrap_or_default();
        format!(
            "Hi {},\n\nThank you for reaching out{}. I have received your message and will get back to you with a detailed response shortly.\n\nBest regards,\n{}",
            contact.name, topic, self.owner_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::contact::ContactStatus;
    use crate::settings::AppEnvironment;
    use chrono::Utc;
    use uuid::Uuid;

    fn contact() -> Contact {
        let now = Utc::now();
        Contact {
            id: Uuid::nil(),
            name: "Grace".into(),
            email: "grace@example.com".into(),
            subject: Some("Collaboration".into()),
            message: "Would you like to work on a compiler together?".into(),
            status: ContactStatus::Unread,
            reply: None,
            replied_at: None,
            ip_address: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn unconfigured_drafter_uses_template() {
        let drafter = ReplyDrafter::from_config(&AppConfig::for_tests(AppEnvironment::Testing));
        let (reply, generated) = drafter.draft(&contact()).await;
        assert!(!generated);
        assert!(reply.starts_with("Hi Grace,"));
        assert!(reply.contains("\"Collaboration\""));
        assert!(reply.ends_with("Owner"));
    }
}
