//! Axum route handlers for the persona chat.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::ChatTurn;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatPayload {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PersonaResponse {
    pub name: String,
    pub title: String,
    pub description: String,
}

/// POST /api/v1/chat
///
/// One quality-controlled turn. The turn itself never fails; only a malformed
/// body (bad JSON, unknown role) is rejected.
pub async fn handle_chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatPayload>, JsonRejection>,
) -> Result<Json<ChatReply>, AppError> {
    let Json(payload) = payload?;
    let reply = state
        .assistant
        .chat(&payload.message, &payload.history)
        .await;
    Ok(Json(ChatReply { reply }))
}

/// GET /api/v1/persona
///
/// Display metadata for the chat UI.
pub async fn handle_persona(State(state): State<AppState>) -> Json<PersonaResponse> {
    let name = state.assistant.name();
    Json(PersonaResponse {
        name: name.to_string(),
        title: format!("Chat with {name}"),
        description: format!(
            "Ask me about {name}'s background, experience, skills, and career!"
        ),
    })
}
