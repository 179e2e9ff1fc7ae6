//! OpenAI Advisory Service - asks a chat-completions model to pick a form.
//!
//! Works against any OpenAI-compatible `/chat/completions` endpoint. The
//! model is asked for a JSON object:
//!
//! ```json
//! { "form_id": "pan_card_application", "confidence": 0.87 }
//! ```
//!
//! with `form_id: null` when nothing in the catalogue fits, optionally
//! accompanied by an `inferred` form description.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAiAdvisoryConfig::new(api_key)
//!     .with_model("gpt-4o-mini")
//!     .with_base_url("https://api.openai.com/v1");
//!
//! let service = OpenAiAdvisoryService::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::session::Speaker;
use crate::ports::{AdvisoryError, AdvisoryRequest, AdvisoryService, AdvisoryVerdict};

/// Configuration for the OpenAI advisory service.
#[derive(Debug, Clone)]
pub struct OpenAiAdvisoryConfig {
    api_key: Secret<String>,
    /// Model to use (e.g. "gpt-4o-mini").
    pub model: String,
    /// Base URL for the API (default: https://api.openai.com/v1).
    pub base_url: String,
    /// HTTP request timeout. The resolver applies its own, usually shorter, bound.
    pub timeout: Duration,
}

impl OpenAiAdvisoryConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Advisory service backed by an OpenAI-compatible chat model.
pub struct OpenAiAdvisoryService {
    config: OpenAiAdvisoryConfig,
    client: Client,
}

impl OpenAiAdvisoryService {
    /// Creates the service.
    ///
    /// # Errors
    ///
    /// `Unavailable` if the HTTP client cannot be built.
    pub fn new(config: OpenAiAdvisoryConfig) -> Result<Self, AdvisoryError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AdvisoryError::unavailable(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn to_openai_request(&self, request: &AdvisoryRequest) -> OpenAiRequest {
        let mut messages = vec![OpenAiMessage {
            role: "system".to_string(),
            content: system_prompt(request),
        }];

        for turn in &request.context {
            messages.push(OpenAiMessage {
                role: match turn.speaker {
                    Speaker::User => "user",
                    Speaker::System => "assistant",
                }
                .to_string(),
                content: turn.text.clone(),
            });
        }

        messages.push(OpenAiMessage {
            role: "user".to_string(),
            content: request.utterance.clone(),
        });

        OpenAiRequest {
            model: self.config.model.clone(),
            messages,
            temperature: 0.0,
            response_format: ResponseFormat {
                kind: "json_object".to_string(),
            },
        }
    }

    async fn send_request(&self, request: &AdvisoryRequest) -> Result<Response, AdvisoryError> {
        self.client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .json(&self.to_openai_request(request))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AdvisoryError::Timeout {
                        timeout_ms: self.config.timeout.as_millis() as u64,
                    }
                } else {
                    AdvisoryError::Network(e.to_string())
                }
            })
    }

    async fn handle_response_status(response: Response) -> Result<Response, AdvisoryError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        match status.as_u16() {
            401 | 403 => Err(AdvisoryError::AuthenticationFailed),
            429 => Err(AdvisoryError::RateLimited),
            500..=599 => Err(AdvisoryError::unavailable(format!(
                "Server error {}: {}",
                status, body
            ))),
            _ => Err(AdvisoryError::Network(format!(
                "Unexpected status {}: {}",
                status, body
            ))),
        }
    }
}

#[async_trait]
impl AdvisoryService for OpenAiAdvisoryService {
    async fn advise(&self, request: AdvisoryRequest) -> Result<AdvisoryVerdict, AdvisoryError> {
        let response = self.send_request(&request).await?;
        let response = Self::handle_response_status(response).await?;

        let body: OpenAiResponse = response
            .json()
            .await
            .map_err(|e| AdvisoryError::Malformed(format!("Failed to parse response: {}", e)))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AdvisoryError::Malformed("No content in response".to_string()))?;

        parse_verdict(&content)
    }

    fn name(&self) -> &str {
        "openai"
    }
}

fn system_prompt(request: &AdvisoryRequest) -> String {
    let catalogue = request
        .catalogue
        .iter()
        .map(|form| format!("- {}: {} ({})", form.id, form.display_name, form.authority))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You route citizens to the government form they need.\n\
         Available forms:\n{}\n\n\
         Reply with a JSON object only: {{\"form_id\": <id from the list or null>, \
         \"confidence\": <number between 0 and 1>}}. Use null when no listed form clearly fits. \
         If no listed form fits but you know the form the user means, you may add \
         \"inferred\": {{\"display_name\": ..., \"authority\": ..., \"fields\": \
         [{{\"name\": ..., \"prompt\": ..., \"type\": \"text|choice|email|phone|date|long-text\", \
         \"required\": true, \"options\": [...]}}]}}.",
        catalogue
    )
}

/// Parses the model's reply, tolerating a surrounding markdown code fence.
pub fn parse_verdict(content: &str) -> Result<AdvisoryVerdict, AdvisoryError> {
    let trimmed = content.trim();
    let json = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    serde_json::from_str(json).map_err(|e| AdvisoryError::Malformed(e.to_string()))
}

// ----- OpenAI API Types -----

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::forms::SchemaRegistry;
    use crate::domain::foundation::Timestamp;
    use crate::domain::session::ConversationTurn;

    #[test]
    fn parse_verdict_reads_plain_json() {
        let verdict = parse_verdict(r#"{"form_id": "passport_application", "confidence": 0.9}"#)
            .unwrap();
        assert_eq!(verdict.form_id.as_deref(), Some("passport_application"));
        assert_eq!(verdict.confidence, 0.9);
    }

    #[test]
    fn parse_verdict_strips_code_fence() {
        let verdict =
            parse_verdict("```json\n{\"form_id\": null, \"confidence\": 0.1}\n```").unwrap();
        assert!(verdict.form_id.is_none());
    }

    #[test]
    fn parse_verdict_rejects_prose() {
        let err = parse_verdict("I think you want a passport.").unwrap_err();
        assert!(matches!(err, AdvisoryError::Malformed(_)));
    }

    #[test]
    fn request_carries_catalogue_context_and_utterance() {
        let service = OpenAiAdvisoryService::new(OpenAiAdvisoryConfig::new("sk-test")).unwrap();
        let registry = SchemaRegistry::builtin().unwrap();
        let request = AdvisoryRequest::new("I lost my passport")
            .with_context(vec![
                ConversationTurn::user("hi", Timestamp::from_unix_secs(1)),
                ConversationTurn::system("hello", Timestamp::from_unix_secs(1)),
            ])
            .with_catalogue(registry.list());

        let body = service.to_openai_request(&request);

        assert_eq!(body.messages.len(), 4);
        assert!(body.messages[0].content.contains("passport_application"));
        assert_eq!(body.messages[2].role, "assistant");
        assert_eq!(body.messages[3].content, "I lost my passport");
        assert_eq!(body.model, "gpt-4o-mini");
    }

    #[test]
    fn completions_url_tolerates_trailing_slash() {
        let service = OpenAiAdvisoryService::new(
            OpenAiAdvisoryConfig::new("sk-test").with_base_url("http://localhost:9999/v1/"),
        )
        .unwrap();
        assert_eq!(
            service.completions_url(),
            "http://localhost:9999/v1/chat/completions"
        );
    }
}
