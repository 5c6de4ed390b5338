//! Application state shared across all route handlers.
//!
//! AppState holds the session store, conversation engine and speech adapter.
//! It is passed to handlers via axum's State extractor.

use std::sync::Arc;

use vox_chat::{ConversationEngine, SessionStore};
use vox_speech::SpeechAdapter;

/// Shared application state.
///
/// All fields use `Arc` for cheap cloning across handler tasks.
#[derive(Clone)]
pub struct AppState {
    /// Session transcripts; the same store the engine writes to.
    pub sessions: Arc<dyn SessionStore>,
    /// Conversation engine backed by the language model.
    pub engine: Arc<ConversationEngine>,
    /// Text-to-speech adapter.
    pub speech: Arc<SpeechAdapter>,
    /// Session used when a request omits `session_id`.
    pub default_session_id: Arc<str>,
}

impl AppState {
    /// Create a new AppState. The session store is taken from the engine so
    /// history reads and conversation writes always hit the same transcripts.
    pub fn new(engine: ConversationEngine, speech: SpeechAdapter) -> Self {
        Self {
            sessions: Arc::clone(engine.store()),
            engine: Arc::new(engine),
            speech: Arc::new(speech),
            default_session_id: Arc::from("default_session"),
        }
    }

    pub fn with_default_session_id(mut self, session_id: impl AsRef<str>) -> Self {
        self.default_session_id = Arc::from(session_id.as_ref());
        self
    }

    /// Resolve an optional request-supplied session id. An empty id means
    /// the default session.
    pub fn session_id_or_default(&self, session_id: Option<String>) -> String {
        session_id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| self.default_session_id.to_string())
    }
}
