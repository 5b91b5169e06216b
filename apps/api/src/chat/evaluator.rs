//! Response Evaluator: structured acceptability verdict from the judge model.
//!
//! Fail-open boundary: if the judge is unreachable or answers off-schema the
//! reply is treated as acceptable.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::chat::prompts::evaluation_request;
use crate::llm_client::{complete_json, ChatBackend, ChatRequest, ResponseFormat};
use crate::models::ChatTurn;

pub const FAIL_OPEN_FEEDBACK: &str = "Evaluation service unavailable";

/// The judge's decision on one candidate reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Verdict {
    pub is_acceptable: bool,
    pub feedback: String,
}

impl Verdict {
    pub fn fail_open() -> Self {
        Self {
            is_acceptable: true,
            feedback: FAIL_OPEN_FEEDBACK.to_string(),
        }
    }
}

/// JSON schema the judge must answer with: exactly two required fields.
pub fn verdict_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "is_acceptable": {"type": "boolean"},
            "feedback": {"type": "string"}
        },
        "required": ["is_acceptable", "feedback"],
        "additionalProperties": false
    })
}

pub struct ResponseEvaluator {
    backend: Arc<dyn ChatBackend>,
    system_prompt: String,
    model: String,
}

impl ResponseEvaluator {
    pub fn new(backend: Arc<dyn ChatBackend>, system_prompt: &str, model: &str) -> Self {
        Self {
            backend,
            system_prompt: system_prompt.to_string(),
            model: model.to_string(),
        }
    }

    pub async fn evaluate(&self, reply: &str, message: &str, history: &[ChatTurn]) -> Verdict {
        let mut request = ChatRequest::new(
            self.model.as_str(),
            vec![
                ChatTurn::system(self.system_prompt.as_str()),
                ChatTurn::user(evaluation_request(history, message, reply)),
            ],
        );
        request.response_format = Some(ResponseFormat::json_schema("evaluation", verdict_schema()));

        match complete_json::<Verdict>(self.backend.as_ref(), &request).await {
            Ok(verdict) => verdict,
            Err(e) => {
                error!("evaluate: failed to evaluate response with {}: {e}", self.model);
                Verdict::fail_open()
            }
        }
    }
}
