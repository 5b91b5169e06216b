mod chat;
mod config;
mod errors;
mod llm_client;
mod models;
mod profile;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::chat::prompts::{StyleRule, DEFAULT_STYLE_INSTRUCTION};
use crate::chat::{ModelEndpoint, PersonaAssistant};
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::profile::{load_profile, ProfilePaths};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing API keys)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Persona API v{}", env!("CARGO_PKG_VERSION"));

    // Load profile context (PDF extraction is blocking)
    let paths = ProfilePaths::from_config(&config);
    let profile = tokio::task::spawn_blocking(move || load_profile(&paths)).await?;

    // Initialize LLM clients
    let timeout = Duration::from_secs(config.llm_timeout_secs);
    let generation = LlmClient::new(
        "generation",
        &config.generation_base_url,
        config.openai_api_key.clone(),
        timeout,
        config.llm_max_attempts,
    )?;
    let evaluation = LlmClient::new(
        "evaluation",
        &config.evaluation_base_url,
        config.google_api_key.clone(),
        timeout,
        config.llm_max_attempts,
    )?;
    info!(
        "LLM clients initialized ({}: {}, {}: {})",
        generation.name(),
        config.generation_model,
        evaluation.name(),
        config.evaluation_model
    );

    let assistant = PersonaAssistant::new(
        &config.persona_name,
        &profile,
        StyleRule::new(&config.style_trigger, DEFAULT_STYLE_INSTRUCTION),
        ModelEndpoint::new(Arc::new(generation), &config.generation_model),
        ModelEndpoint::new(Arc::new(evaluation), &config.evaluation_model),
    );
    info!(
        "Persona assistant ready for {} (assistant prompt {} chars, evaluator prompt {} chars)",
        assistant.name(),
        assistant.prompts().assistant.len(),
        assistant.prompts().evaluator.len()
    );

    // Build app state
    let state = AppState {
        assistant: Arc::new(assistant),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
