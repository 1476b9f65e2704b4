//! Chat-completions client: one POST per call, no retries.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{ApiKey, Settings};
use crate::error::GenerationError;

/// Maximum characters of an error response body kept in `ApiHttp`.
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }
}

/// Request body for the completion endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

/// Something that turns a [`GenerationRequest`] into generated text.
///
/// This abstraction allows mocking the remote API in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Send the request once and return the first completion's text.
    async fn complete(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}

/// Backend that POSTs to an OpenAI-compatible chat-completions endpoint.
pub struct HttpCompletionClient {
    client: Client,
    endpoint: String,
    api_key: ApiKey,
}

impl HttpCompletionClient {
    pub fn new(settings: &Settings) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(GenerationError::ClientBuild)?;

        Ok(Self {
            client,
            endpoint: settings.api_url.clone(),
            api_key: settings.api_key.clone(),
        })
    }
}

#[async_trait]
impl CompletionBackend for HttpCompletionClient {
    async fn complete(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        debug!(
            model = %request.model,
            messages = request.messages.len(),
            max_tokens = request.max_tokens,
            "Sending completion request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose())
            .json(request)
            .send()
            .await
            .map_err(GenerationError::Transport)?;

        let status = response.status();
        debug!(status = status.as_u16(), "Completion API responded");

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(GenerationError::RateLimited);
        }

        let body = response.text().await.map_err(GenerationError::Transport)?;

        if status.is_client_error() || status.is_server_error() {
            return Err(GenerationError::ApiHttp {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        parse_completion(&body)
    }
}

/// Extract the generated text from a response body.
///
/// An `error.message` wins over any choices, even when the HTTP status was a
/// success.
pub fn parse_completion(body: &str) -> Result<String, GenerationError> {
    let response: CompletionResponse = serde_json::from_str(body)
        .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

    if let Some(message) = response.error.and_then(|e| e.message) {
        return Err(GenerationError::ApiLogical { message });
    }

    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or(GenerationError::EmptyGeneration)
}
