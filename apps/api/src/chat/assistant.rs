//! Quality-Control Loop: generate, evaluate, regenerate at most once.
//!
//! Flow: empty-check → GENERATE (style rule applied) → EVALUATE →
//!       ACCEPT | REGENERATE (with rejection block) → reply.
//!
//! The second reply is returned unconditionally: no second evaluation pass,
//! so a turn costs at most three model calls.

use std::sync::Arc;

use tokio::task::AbortHandle;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::chat::evaluator::ResponseEvaluator;
use crate::chat::generator::{Generation, ResponseGenerator};
use crate::chat::prompts::{
    apology, build_system_prompts, rejection_prompt, styled_prompt, StyleRule, SystemPrompts,
    PROMPT_FOR_INPUT,
};
use crate::llm_client::ChatBackend;
use crate::models::ChatTurn;
use crate::profile::ProfileContext;

/// A backend plus the model id to request from it.
#[derive(Clone)]
pub struct ModelEndpoint {
    pub backend: Arc<dyn ChatBackend>,
    pub model: String,
}

impl ModelEndpoint {
    pub fn new(backend: Arc<dyn ChatBackend>, model: &str) -> Self {
        Self {
            backend,
            model: model.to_string(),
        }
    }
}

/// The persona assistant. Built once at startup; read-only afterwards, so one
/// `Arc<PersonaAssistant>` serves every request.
pub struct PersonaAssistant {
    name: String,
    prompts: SystemPrompts,
    style: StyleRule,
    generator: ResponseGenerator,
    evaluator: ResponseEvaluator,
}

impl PersonaAssistant {
    pub fn new(
        name: &str,
        profile: &ProfileContext,
        style: StyleRule,
        generation: ModelEndpoint,
        evaluation: ModelEndpoint,
    ) -> Self {
        let prompts = build_system_prompts(name, profile);
        let generator = ResponseGenerator::new(generation.backend, name, &generation.model);
        let evaluator =
            ResponseEvaluator::new(evaluation.backend, &prompts.evaluator, &evaluation.model);

        Self {
            name: name.to_string(),
            prompts,
            style,
            generator,
            evaluator,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prompts(&self) -> &SystemPrompts {
        &self.prompts
    }

    /// Answers one visitor message. Never fails: every error path ends in the
    /// apology text.
    ///
    /// The turn runs as its own task so a panic anywhere inside it is caught
    /// at the join and converted like any other failure. The task is owned by
    /// this future: dropping it (client disconnect, caller timeout) aborts the
    /// turn before any further model call.
    pub async fn chat(self: &Arc<Self>, message: &str, history: &[ChatTurn]) -> String {
        if message.trim().is_empty() {
            return PROMPT_FOR_INPUT.to_string();
        }

        let this = Arc::clone(self);
        let message = message.to_string();
        let history = history.to_vec();
        let span = info_span!("turn", turn_id = %Uuid::new_v4());

        let turn = tokio::spawn(
            async move { this.run_turn(&message, &history).await }.instrument(span),
        );
        let _guard = AbortOnDrop(turn.abort_handle());

        match turn.await {
            Ok(reply) => reply,
            Err(e) if e.is_panic() => {
                error!("chat: turn panicked: {e}");
                apology(&self.name)
            }
            Err(e) => {
                error!("chat: turn cancelled: {e}");
                apology(&self.name)
            }
        }
    }

    async fn run_turn(&self, message: &str, history: &[ChatTurn]) -> String {
        let model = self.generator.default_model();

        let system_prompt = if self.style.matches(message) {
            info!("Style trigger matched; applying style instruction");
            styled_prompt(&self.prompts.assistant, &self.style)
        } else {
            self.prompts.assistant.clone()
        };

        let reply = match self
            .generator
            .generate(message, history, &system_prompt, model)
            .await
        {
            Generation::Reply(reply) => reply,
            // Nothing worth judging; hand back the apology as-is.
            Generation::Fallback(apology) => return apology,
        };

        let verdict = self.evaluator.evaluate(&reply, message, history).await;

        if verdict.is_acceptable {
            info!("Response passed evaluation");
            return reply;
        }

        warn!("Response failed evaluation: {}", verdict.feedback);
        let retry_prompt = rejection_prompt(&self.prompts.assistant, &reply, &verdict.feedback);

        self.generator
            .generate(message, history, &retry_prompt, model)
            .await
            .into_text()
    }
}

/// Aborts the wrapped task when dropped. A no-op once the task has finished.
struct AbortOnDrop(AbortHandle);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}
