//! Prompt assembly.

use vox_core::types::{Role, Turn};

/// Reply the model is told to give for inappropriate or vague questions.
///
/// Enforced only through the instructions below; nothing checks the model
/// actually complies.
pub const REFUSAL_MESSAGE: &str =
    "⚠️ I am here to assist with any questions you may have. Kindly ask appropriate questions.";

/// Fixed system instructions sent ahead of every conversation.
pub const SYSTEM_INSTRUCTIONS: &str = "\
You are an intelligent and versatile AI voice assistant.
Your role is to provide **clear, determined, and impressive answers** across any topic of knowledge, communication, or assistance.

If a question is inappropriate or vague,
respond with:
**\"⚠️ I am here to assist with any questions you may have. Kindly ask appropriate questions.\"**

Guidelines for answering:
- Always respond with **confidence and precision**, avoiding vague or filler phrases.
- Deliver responses that feel **concise and polished**.
- Communicate in a **human-like, natural, and professional tone**.
- When appropriate, ask if the user would like further assistance or help.
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptRole {
    System,
    User,
    Assistant,
}

impl From<Role> for PromptRole {
    fn from(role: Role) -> Self {
        match role {
            Role::User => PromptRole::User,
            Role::Assistant => PromptRole::Assistant,
        }
    }
}

/// One message of the prompt sent to the language model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptMessage {
    pub role: PromptRole,
    pub content: String,
}

impl PromptMessage {
    pub fn new(role: PromptRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

impl From<&Turn> for PromptMessage {
    fn from(turn: &Turn) -> Self {
        PromptMessage::new(turn.role.into(), turn.content.clone())
    }
}

/// Build the full prompt: system instructions, then the prior transcript in
/// order, then the new user input.
pub fn build_prompt(
    system_instructions: &str,
    prior_turns: &[Turn],
    new_input: &str,
) -> Vec<PromptMessage> {
    let mut messages = Vec::with_capacity(prior_turns.len() + 2);
    messages.push(PromptMessage::new(PromptRole::System, system_instructions));
    messages.extend(prior_turns.iter().map(PromptMessage::from));
    messages.push(PromptMessage::new(PromptRole::User, new_input));
    messages
}
