use std::sync::Arc;

use crate::chat::PersonaAssistant;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Read-only after startup; turns never mutate it.
    pub assistant: Arc<PersonaAssistant>,
}
