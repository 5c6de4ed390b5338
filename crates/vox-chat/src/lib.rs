//! Conversation layer for Vox.
//!
//! Holds per-session transcripts, assembles prompts from them, and talks to
//! the hosted language model.

pub mod engine;
pub mod llm;
pub mod prompt;
pub mod store;

pub use engine::{ConversationEngine, Reply};
pub use llm::{LanguageModel, VertexGeminiClient};
pub use prompt::{build_prompt, PromptMessage, PromptRole, REFUSAL_MESSAGE, SYSTEM_INSTRUCTIONS};
pub use store::{InMemorySessionStore, Session, SessionHandle, SessionStore};
