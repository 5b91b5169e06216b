// Persona chat: prompt construction, generation, evaluation, and the
// quality-control loop tying them together.
// All model calls go through llm_client::ChatBackend.

pub mod assistant;
pub mod evaluator;
pub mod generator;
pub mod prompts;

pub use assistant::{ModelEndpoint, PersonaAssistant};
