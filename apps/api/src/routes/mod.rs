pub mod chat;
pub mod health;

use axum::{
    http::Uri,
    routing::{get, post},
    Router,
};

use crate::errors::AppError;
use crate::state::AppState;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {uri}"))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/persona", get(chat::handle_persona))
        .route("/api/v1/chat", post(chat::handle_chat))
        .fallback(not_found)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::chat::prompts::{StyleRule, PROMPT_FOR_INPUT};
    use crate::chat::{ModelEndpoint, PersonaAssistant};
    use crate::llm_client::fake::ScriptedBackend;
    use crate::profile::ProfileContext;

    fn app(generation: ScriptedBackend, evaluation: ScriptedBackend) -> Router {
        let assistant = PersonaAssistant::new(
            "Ada",
            &ProfileContext::default(),
            StyleRule::default(),
            ModelEndpoint::new(Arc::new(generation), "gen-model"),
            ModelEndpoint::new(Arc::new(evaluation), "judge-model"),
        );
        build_router(AppState {
            assistant: Arc::new(assistant),
        })
    }

    fn post_chat(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/chat")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(ScriptedBackend::new(), ScriptedBackend::new())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_persona_metadata() {
        let response = app(ScriptedBackend::new(), ScriptedBackend::new())
            .oneshot(Request::get("/api/v1/persona").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let body = json_body(response).await;
        assert_eq!(body["name"], "Ada");
        assert_eq!(body["title"], "Chat with Ada");
        assert!(body["description"].as_str().unwrap().contains("Ada's background"));
    }

    #[tokio::test]
    async fn test_chat_turn_round_trip() {
        let router = app(
            ScriptedBackend::new().reply("I build backend systems."),
            ScriptedBackend::new().reply(r#"{"is_acceptable": true, "feedback": "ok"}"#),
        );

        let response = router
            .oneshot(post_chat(json!({
                "message": "What do you do?",
                "history": [
                    {"role": "user", "content": "Hi"},
                    {"role": "assistant", "content": "Hello!"}
                ]
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["reply"], "I build backend systems.");
    }

    #[tokio::test]
    async fn test_chat_history_optional_and_blank_message() {
        let response = app(ScriptedBackend::new(), ScriptedBackend::new())
            .oneshot(post_chat(json!({"message": "  "})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["reply"], PROMPT_FOR_INPUT);
    }

    #[tokio::test]
    async fn test_chat_unknown_role_rejected() {
        let response = app(ScriptedBackend::new(), ScriptedBackend::new())
            .oneshot(post_chat(json!({
                "message": "Hi",
                "history": [{"role": "narrator", "content": "..."}]
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let response = app(ScriptedBackend::new(), ScriptedBackend::new())
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"]["code"], "NOT_FOUND");
    }
}
