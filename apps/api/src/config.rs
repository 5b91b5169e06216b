use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if either API key is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub google_api_key: String,
    pub persona_name: String,
    pub linkedin_pdf_path: PathBuf,
    pub summary_path: PathBuf,
    pub generation_base_url: String,
    pub generation_model: String,
    pub evaluation_base_url: String,
    pub evaluation_model: String,
    pub style_trigger: String,
    pub llm_timeout_secs: u64,
    pub llm_max_attempts: u32,
    pub host: String,
    pub port: u16,
    pub rust_log: String,
}

pub const DEFAULT_PERSONA_NAME: &str = "Md. Morshed Jamal";
pub const DEFAULT_GENERATION_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_GENERATION_MODEL: &str = "tngtech/deepseek-r1t2-chimera:free";
pub const DEFAULT_EVALUATION_BASE_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/openai";
pub const DEFAULT_EVALUATION_MODEL: &str = "gemini-2.5-flash";

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. `from_env` passes the
    /// process environment; tests pass a map.
    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("Required environment variable '{key}' is not set"))
        };
        let or_default = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(Config {
            openai_api_key: require("OPENAI_API_KEY")?,
            google_api_key: require("GOOGLE_API_KEY")?,
            persona_name: or_default("PERSONA_NAME", DEFAULT_PERSONA_NAME),
            linkedin_pdf_path: or_default("LINKEDIN_PDF_PATH", "me/linkedin.pdf").into(),
            summary_path: or_default("SUMMARY_PATH", "me/summary.txt").into(),
            generation_base_url: or_default("GENERATION_BASE_URL", DEFAULT_GENERATION_BASE_URL),
            generation_model: or_default("GENERATION_MODEL", DEFAULT_GENERATION_MODEL),
            evaluation_base_url: or_default("EVALUATION_BASE_URL", DEFAULT_EVALUATION_BASE_URL),
            evaluation_model: or_default("EVALUATION_MODEL", DEFAULT_EVALUATION_MODEL),
            style_trigger: or_default("STYLE_TRIGGER", "patent"),
            llm_timeout_secs: parse_or(&lookup, "LLM_TIMEOUT_SECS", 120)?,
            llm_max_attempts: parse_or(&lookup, "LLM_MAX_ATTEMPTS", 1)?,
            host: or_default("HOST", "0.0.0.0"),
            port: parse_or(&lookup, "PORT", 7860)?,
            rust_log: or_default("RUST_LOG", "info"),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
