// Prompt templates for the persona chat.
// Every template uses `{name}`-style placeholders filled by `fill`.

use crate::models::ChatTurn;
use crate::profile::ProfileContext;

/// Persona framing for the answering model. Replace `{name}`.
pub const ASSISTANT_FRAMING: &str = "You are acting as {name}. \
    You are answering questions on {name}'s website, \
    particularly questions related to {name}'s career, background, skills and experience. \
    Your responsibility is to represent {name} for interactions on the website as faithfully as possible. \
    You are given a summary of {name}'s background and LinkedIn profile which you can use to answer questions. \
    Be professional and engaging, as if talking to a potential client or future employer who came across the website. \
    If you don't know the answer, say so politely and suggest they contact {name} directly.";

/// Closing instruction for the answering model. Replace `{name}`.
pub const ASSISTANT_CLOSING: &str =
    "With this context, please chat with the user, always staying in character as {name}.";

/// Judge framing for the evaluating model. Replace `{name}`.
pub const EVALUATOR_FRAMING: &str = "You are an evaluator that decides whether a response to a question is acceptable quality. \
    You are provided with a conversation between a User and an Agent. \
    Your task is to decide whether the Agent's latest response is acceptable. \
    The Agent is playing the role of {name} and is representing {name} on their website. \
    The Agent has been instructed to be professional and engaging, as if talking to a potential client or future employer. \
    The Agent has been provided with context on {name}. Here's the information:";

pub const EVALUATOR_CLOSING: &str = "With this context, please evaluate the latest response, \
    replying with whether the response is acceptable and your feedback.";

/// Evaluator user message.
/// Replace: {history}, {message}, {reply}
pub const EVALUATION_REQUEST_TEMPLATE: &str = "Here's the conversation between the User and the Agent:

{history}

Here's the latest message from the User:

{message}

Here's the latest response from the Agent:

{reply}

Please evaluate the response, replying with whether it is acceptable and your feedback.";

/// Appended to the assistant prompt after a rejected attempt.
/// Replace: {reply}, {feedback}
pub const REJECTION_TEMPLATE: &str = "## Previous answer rejected
You just tried to reply, but the quality control rejected your reply.
## Your attempted answer:
{reply}

## Reason for rejection:
{feedback}

Please provide a better response that addresses the feedback.";

pub const EMPTY_HISTORY_PLACEHOLDER: &str = "No previous conversation.";

pub const PROMPT_FOR_INPUT: &str =
    "Please ask me a question about my background, experience, or skills!";

/// Canned reply used whenever a turn cannot produce a model answer. Replace `{name}`.
pub const APOLOGY_TEMPLATE: &str = "I apologize, but I'm experiencing technical difficulties. \
    Please try again later or contact {name} directly.";

pub const DEFAULT_STYLE_INSTRUCTION: &str = "IMPORTANT: Everything in your reply needs to be in pig latin - \
    it is mandatory that you respond only and entirely in pig latin.";

/// The two system prompts, built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemPrompts {
    pub assistant: String,
    pub evaluator: String,
}

/// A mandatory stylistic constraint applied when the message mentions `trigger`.
#[derive(Debug, Clone)]
pub struct StyleRule {
    trigger: String,
    pub instruction: String,
}

impl StyleRule {
    pub fn new(trigger: &str, instruction: &str) -> Self {
        Self {
            trigger: trigger.to_lowercase(),
            instruction: instruction.to_string(),
        }
    }

    /// Case-insensitive substring match. A blank trigger never matches.
    pub fn matches(&self, message: &str) -> bool {
        !self.trigger.trim().is_empty() && message.to_lowercase().contains(&self.trigger)
    }
}

impl Default for StyleRule {
    fn default() -> Self {
        Self::new("patent", DEFAULT_STYLE_INSTRUCTION)
    }
}

/// Builds both system prompts. Missing profile sections are omitted.
pub fn build_system_prompts(name: &str, profile: &ProfileContext) -> SystemPrompts {
    SystemPrompts {
        assistant: assemble(ASSISTANT_FRAMING, ASSISTANT_CLOSING, name, profile),
        evaluator: assemble(EVALUATOR_FRAMING, EVALUATOR_CLOSING, name, profile),
    }
}

fn assemble(framing: &str, closing: &str, name: &str, profile: &ProfileContext) -> String {
    let mut prompt = fill(framing, &[("name", name)]);

    if let Some(summary) = &profile.summary {
        prompt.push_str("\n\n## Summary:\n");
        prompt.push_str(summary);
    }
    if let Some(linkedin) = &profile.linkedin {
        prompt.push_str("\n\n## LinkedIn Profile:\n");
        prompt.push_str(linkedin);
    }

    prompt.push_str("\n\n");
    prompt.push_str(&fill(closing, &[("name", name)]));
    prompt
}

/// Renders history as `Role: content` blocks separated by blank lines.
pub fn format_history(history: &[ChatTurn]) -> String {
    if history.is_empty() {
        return EMPTY_HISTORY_PLACEHOLDER.to_string();
    }

    history
        .iter()
        .map(|turn| format!("{}: {}", turn.role.label(), turn.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn evaluation_request(history: &[ChatTurn], message: &str, reply: &str) -> String {
    let transcript = format_history(history);
    fill(
        EVALUATION_REQUEST_TEMPLATE,
        &[
            ("history", transcript.as_str()),
            ("message", message),
            ("reply", reply),
        ],
    )
}

pub fn styled_prompt(base: &str, rule: &StyleRule) -> String {
    format!("{base}\n\n{}", rule.instruction)
}

pub fn rejection_prompt(base: &str, attempted_reply: &str, feedback: &str) -> String {
    let block = fill(
        REJECTION_TEMPLATE,
        &[("reply", attempted_reply), ("feedback", feedback)],
    );
    format!("{base}\n\n{block}")
}

pub fn apology(name: &str) -> String {
    fill(APOLOGY_TEMPLATE, &[("name", name)])
}

/// Single-pass placeholder substitution. Substituted values are never
/// rescanned, so user text containing `{reply}` and the like stays verbatim.
fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let hit = vars
            .iter()
            .find(|(key, _)| tail.starts_with(key) && tail[key.len()..].starts_with('}'));

        match hit {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    out
}
