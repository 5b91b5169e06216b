use std::panic;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::profile::ProfileContext;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("PDF extraction failed for {}: {message}", path.display())]
    Pdf { path: PathBuf, message: String },
}

/// Where the two profile sources live on disk.
#[derive(Debug, Clone)]
pub struct ProfilePaths {
    pub linkedin_pdf: PathBuf,
    pub summary: PathBuf,
}

impl ProfilePaths {
    pub fn from_config(config: &Config) -> Self {
        Self {
            linkedin_pdf: config.linkedin_pdf_path.clone(),
            summary: config.summary_path.clone(),
        }
    }
}

/// Loads both profile sources. Never fails: a missing file is logged at
/// `warn`, an unreadable one at `error`, and the section is left empty.
///
/// Blocking; call from `spawn_blocking` inside the runtime.
pub fn load_profile(paths: &ProfilePaths) -> ProfileContext {
    let linkedin = load_optional("LinkedIn PDF", &paths.linkedin_pdf, extract_pdf_text);
    let summary = load_optional("Summary", &paths.summary, read_text_file);

    let context = ProfileContext::new(linkedin, summary);
    if context.is_empty() {
        warn!("No profile context loaded; prompts will carry persona instructions only");
    }
    context
}

fn load_optional<F>(label: &str, path: &Path, read: F) -> Option<String>
where
    F: Fn(&Path) -> Result<String, ProfileError>,
{
    if !path.exists() {
        warn!("{label} not found at {}", path.display());
        return None;
    }

    match read(path) {
        Ok(text) => {
            info!("{label} loaded: {} characters", text.trim().chars().count());
            Some(text)
        }
        Err(e) => {
            error!("Failed to load {label}: {e}");
            None
        }
    }
}

fn read_text_file(path: &Path) -> Result<String, ProfileError> {
    std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn extract_pdf_text(path: &Path) -> Result<String, ProfileError> {
    // pdf-extract panics on some malformed documents instead of returning Err.
    let outcome = panic::catch_unwind(|| pdf_extract::extract_text(path));

    match outcome {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(ProfileError::Pdf {
            path: path.to_path_buf(),
            message: e.to_string(),
        }),
        Err(_) => Err(ProfileError::Pdf {
            path: path.to_path_buf(),
            message: "extractor panicked on malformed document".to_string(),
        }),
    }
}
