//! LLM Client: the single point of entry for every chat-completion call.
//!
//! ARCHITECTURAL RULE: the generator and evaluator never talk HTTP themselves.
//! They go through the `ChatBackend` trait, which `LlmClient` implements for
//! any OpenAI-compatible `/chat/completions` endpoint (OpenRouter, Gemini's
//! OpenAI surface, ...).
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::ChatTurn;

#[cfg(test)]
pub mod fake;

const BACKOFF_BASE_MS: u64 = 1000;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Structured-output constraint attached to a request.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    JsonSchema { json_schema: JsonSchemaFormat },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct JsonSchemaFormat {
    pub name: String,
    pub strict: bool,
    pub schema: serde_json::Value,
}

impl ResponseFormat {
    pub fn json_schema(name: &str, schema: serde_json::Value) -> Self {
        ResponseFormat::JsonSchema {
            json_schema: JsonSchemaFormat {
                name: name.to_string(),
                strict: true,
                schema,
            },
        }
    }
}

/// Request body for `POST {base_url}/chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatTurn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatTurn>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: None,
            max_tokens: None,
            response_format: None,
        }
    }

    /// The first system message, if any.
    #[cfg(test)]
    pub fn system_prompt(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == crate::models::Role::System)
            .map(|m| m.content.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Anything that can turn a chat request into a single text completion.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError>;
}

/// Calls the backend and deserializes the completion text as JSON.
/// The request should carry a `response_format` or instruct JSON output.
pub async fn complete_json<T: DeserializeOwned>(
    backend: &dyn ChatBackend,
    request: &ChatRequest,
) -> Result<T, LlmError> {
    let text = backend.complete(request).await?;
    let text = strip_json_fences(&text);
    serde_json::from_str(text).map_err(LlmError::Parse)
}

/// OpenAI-compatible chat-completion client with bearer auth and retry on
/// 429 / 5xx / transport errors.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    name: &'static str,
    base_url: String,
    api_key: String,
    max_attempts: u32,
    backoff_base: Duration,
}

impl LlmClient {
    pub fn new(
        name: &'static str,
        base_url: &str,
        api_key: String,
        timeout: Duration,
        max_attempts: u32,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            name,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            max_attempts: max_attempts.max(1),
            backoff_base: Duration::from_millis(BACKOFF_BASE_MS),
        })
    }

    #[cfg(test)]
    pub fn with_backoff(mut self, base: Duration) -> Self {
        self.backoff_base = base;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl ChatBackend for LlmClient {
    /// Retries on 429 (rate limit), 5xx and transport errors with exponential
    /// backoff. Other non-success statuses fail immediately.
    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError> {
        let url = self.completions_url();
        let mut attempt = 1;

        loop {
            let response = self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(request)
                .send()
                .await;

            let error = match response {
                Err(e) => LlmError::Http(e),
                Ok(response) => {
                    let status = response.status();

                    if status.as_u16() == 429 || status.is_server_error() {
                        let body = response.text().await.unwrap_or_default();
                        warn!("{} API returned {}: {}", self.name, status, body);
                        LlmError::Api {
                            status: status.as_u16(),
                            message: body,
                        }
                    } else if !status.is_success() {
                        let body = response.text().await.unwrap_or_default();
                        let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                            .map(|e| e.error.message)
                            .unwrap_or(body);
                        return Err(LlmError::Api {
                            status: status.as_u16(),
                            message,
                        });
                    } else {
                        let completion: ChatCompletion = response.json().await?;

                        if let Some(usage) = &completion.usage {
                            debug!(
                                "{} call succeeded: model={}, prompt_tokens={}, completion_tokens={}",
                                self.name, request.model, usage.prompt_tokens, usage.completion_tokens
                            );
                        }

                        return completion
                            .choices
                            .into_iter()
                            .next()
                            .and_then(|c| c.message.content)
                            .filter(|text| !text.trim().is_empty())
                            .ok_or(LlmError::EmptyContent);
                    }
                }
            };

            if attempt >= self.max_attempts {
                return Err(error);
            }

            // Exponential backoff: base, 2x base, 4x base
            let delay = self.backoff_base * 2u32.pow(attempt - 1);
            warn!(
                "{} call attempt {} failed, retrying after {}ms...",
                self.name,
                attempt,
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
