//! Hugging Face chat-completions provider
//!
//! Talks to the OpenAI-compatible `/chat/completions` route exposed by the
//! Hugging Face inference router. One request per call; retries are left to
//! the endpoint.

use std::fmt;
use std::time::Duration;

use reqwest::{Client, StatusCode, header};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::config::Config;
use crate::providers::{Completion, CompletionError, CompletionProvider};
use crate::session::Turn;

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
    /// Either `{"message": ..}` or a bare string, depending on the backend
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
    #[serde(default)]
    #[allow(dead_code)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

/// Provider backed by a Hugging Face hosted model.
///
/// A missing API token is not an error at construction; it is reported the
/// first time a completion is requested.
#[derive(Clone)]
pub struct HuggingFaceProvider {
    api_token: Option<String>,
    base_url: String,
    model: String,
    timeout_seconds: u64,
    client: Client,
}

impl fmt::Debug for HuggingFaceProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HuggingFaceProvider")
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish_non_exhaustive()
    }
}

impl HuggingFaceProvider {
    /// Builds the provider and its HTTP client.
    pub fn new(
        api_token: Option<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout_seconds: u64,
    ) -> Result<Self, CompletionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| CompletionError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_token,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            timeout_seconds,
            client,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, CompletionError> {
        Self::new(
            config.api_token.clone(),
            config.base_url.clone(),
            config.model.clone(),
            config.timeout_seconds,
        )
    }

    fn build_request(&self, turns: Vec<Turn>, max_new_tokens: u32) -> ChatRequest {
        let messages = turns
            .into_iter()
            .map(|turn| ChatMessage {
                role: turn.role.as_str().to_string(),
                content: Some(turn.content),
            })
            .collect();

        ChatRequest {
            model: self.model.clone(),
            messages,
            max_tokens: max_new_tokens,
        }
    }

    fn parse_response(&self, response: ChatResponse) -> Result<Completion, CompletionError> {
        if let Some(err) = response.error {
            return Err(CompletionError::provider(error_message(&err), None::<&str>));
        }

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| CompletionError::malformed("No response choices returned"))?;

        let mut completion = Completion::new(choice.message.content.unwrap_or_default());
        if let Some(usage) = response.usage {
            completion = completion.with_tokens(usage.prompt_tokens, usage.completion_tokens);
        }
        Ok(completion)
    }

    fn map_transport_error(&self, e: &reqwest::Error) -> CompletionError {
        if e.is_timeout() {
            CompletionError::timeout(self.timeout_seconds)
        } else if e.is_connect() {
            CompletionError::network(format!("Connection failed: {}", e))
        } else {
            CompletionError::network(format!("Request failed: {}", e))
        }
    }

    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, CompletionError> {
        let token = self
            .api_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| CompletionError::config("HUGGINGFACE_API_TOKEN is not set"))?;

        let url = format!("{}/chat/completions", self.base_url);
        debug!(url = %url, model = %self.model, "Making chat-completions request");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Request failed");
                self.map_transport_error(&e)
            })?;

        let status = resp.status();
        debug!(status = %status, "Received response");

        if !status.is_success() {
            let retry_after = resp
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            let body = resp.text().await.unwrap_or_default();
            return Err(map_status(status, &body, retry_after));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| self.map_transport_error(&e))?;
        serde_json::from_str::<ChatResponse>(&body)
            .map_err(|e| CompletionError::malformed(format!("Failed to parse response: {}", e)))
    }
}

/// Extracts a human readable message from an `error` payload.
fn error_message(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Object(map) => map
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| value.to_string()),
        other => other.to_string(),
    }
}

/// Maps a non-200 status and its body to the matching error variant.
fn map_status(status: StatusCode, body: &str, retry_after: Option<u64>) -> CompletionError {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").map(error_message))
        .unwrap_or_else(|| body.trim().to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            CompletionError::auth(format!("Authentication failed ({}): {}", status, detail))
        }
        StatusCode::TOO_MANY_REQUESTS => CompletionError::rate_limit(detail, retry_after),
        s if s.is_client_error() => {
            CompletionError::invalid_request(format!("Client error ({}): {}", s, detail))
        }
        s if s.is_server_error() => CompletionError::provider(
            format!("Server error ({}): {}", s, detail),
            Some(s.as_u16().to_string()),
        ),
        s => CompletionError::provider(
            format!("Unexpected status ({}): {}", s, detail),
            Some(s.as_u16().to_string()),
        ),
    }
}

#[async_trait::async_trait]
impl CompletionProvider for HuggingFaceProvider {
    async fn complete(
        &self,
        turns: Vec<Turn>,
        max_new_tokens: u32,
    ) -> Result<Completion, CompletionError> {
        info!(
            model = %self.model,
            message_count = turns.len(),
            max_new_tokens,
            "Sending chat request to huggingface"
        );

        let request = self.build_request(turns, max_new_tokens);
        let response = self.send(&request).await?;
        let completion = self.parse_response(response)?;

        info!(
            content_length = completion.content.len(),
            prompt_tokens = ?completion.prompt_tokens,
            completion_tokens = ?completion.completion_tokens,
            total_tokens = ?completion.total_tokens(),
            "Received response from huggingface"
        );

        Ok(completion)
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn provider_name(&self) -> &'static str {
        "huggingface"
    }
}
