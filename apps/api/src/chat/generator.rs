//! Response Generator: one completion from the primary model.
//!
//! Fail-soft boundary: any transport or API failure becomes the canned
//! apology. Callers always get text back.

use std::sync::Arc;

use tracing::{error, info};

use crate::chat::prompts::apology;
use crate::llm_client::{ChatBackend, ChatRequest};
use crate::models::ChatTurn;

pub const TEMPERATURE: f32 = 0.7;
pub const MAX_OUTPUT_TOKENS: u32 = 1000;

/// Result of a generation call. `Fallback` carries the apology text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    Reply(String),
    Fallback(String),
}

impl Generation {
    pub fn into_text(self) -> String {
        match self {
            Generation::Reply(text) | Generation::Fallback(text) => text,
        }
    }
}

pub struct ResponseGenerator {
    backend: Arc<dyn ChatBackend>,
    persona_name: String,
    default_model: String,
}

impl ResponseGenerator {
    pub fn new(backend: Arc<dyn ChatBackend>, persona_name: &str, default_model: &str) -> Self {
        Self {
            backend,
            persona_name: persona_name.to_string(),
            default_model: default_model.to_string(),
        }
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Sends `[system] + history + [user message]` and returns the completion.
    pub async fn generate(
        &self,
        message: &str,
        history: &[ChatTurn],
        system_prompt: &str,
        model: &str,
    ) -> Generation {
        let request = build_request(message, history, system_prompt, model);

        match self.backend.complete(&request).await {
            Ok(text) => {
                info!("Generated reply with {model} ({} chars)", text.chars().count());
                Generation::Reply(text)
            }
            Err(e) => {
                error!("generate: failed to generate response with {model}: {e}");
                Generation::Fallback(apology(&self.persona_name))
            }
        }
    }
}

fn build_request(
    message: &str,
    history: &[ChatTurn],
    system_prompt: &str,
    model: &str,
) -> ChatRequest {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatTurn::system(system_prompt));
    messages.extend(history.iter().cloned());
    messages.push(ChatTurn::user(message));

    let mut request = ChatRequest::new(model, messages);
    request.temperature = Some(TEMPERATURE);
    request.max_tokens = Some(MAX_OUTPUT_TOKENS);
    request
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::fake::ScriptedBackend;
    use crate::models::Role;

    #[tokio::test]
    async fn test_generate_composes_system_history_user() {
        let backend = Arc::new(ScriptedBackend::new().reply("Sure, happy to help."));
        let generator = ResponseGenerator::new(backend.clone(), "Ada", "model-a");
        let history = vec![ChatTurn::user("Hi"), ChatTurn::assistant("Hello!")];

        let out = generator
            .generate("What do you do?", &history, "SYSTEM", "model-b")
            .await;

        assert_eq!(out, Generation::Reply("Sure, happy to help.".to_string()));

        let requests = backend.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.model, "model-b");
        assert_eq!(request.temperature, Some(TEMPERATURE));
        assert_eq!(request.max_tokens, Some(MAX_OUTPUT_TOKENS));
        assert!(request.response_format.is_none());

        let roles: Vec<Role> = request.messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::System, Role::User, Role::Assistant, Role::User]
        );
        assert_eq!(request.messages[0].content, "SYSTEM");
        assert_eq!(request.messages[3].content, "What do you do?");
    }

    #[tokio::test]
    async fn test_generate_failure_returns_apology() {
        let backend = Arc::new(ScriptedBackend::new().fail(502));
        let generator = ResponseGenerator::new(backend.clone(), "Ada Lovelace", "model-a");

        let out = generator.generate("Hi", &[], "SYSTEM", "model-a").await;

        let Generation::Fallback(text) = out else {
            panic!("expected the apology fallback");
        };
        assert!(text.contains("Ada Lovelace"));
        assert!(text.starts_with("I apologize"));
        assert_eq!(backend.call_count(), 1);
    }
}
