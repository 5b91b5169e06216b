//! Profile Context: the grounding text the persona answers from.
//!
//! Both sources are optional. A missing or unreadable source leaves its field
//! `None`; prompt assembly simply omits that section.

pub mod loader;

pub use loader::{load_profile, ProfilePaths};

/// Extracted profile text, immutable after startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileContext {
    /// Plain text extracted from the LinkedIn PDF export.
    pub linkedin: Option<String>,
    /// Free-text summary written by the persona.
    pub summary: Option<String>,
}

impl ProfileContext {
    pub fn new(linkedin: Option<String>, summary: Option<String>) -> Self {
        Self {
            linkedin: non_blank(linkedin),
            summary: non_blank(summary),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.linkedin.is_none() && self.summary.is_none()
    }
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}
