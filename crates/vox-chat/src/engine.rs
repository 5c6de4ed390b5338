//! Conversation engine: one user query in, one model reply out, transcript
//! updated in between.

use std::sync::Arc;

use tracing::{debug, warn};

use vox_core::error::ServiceError;
use vox_core::types::Turn;

use crate::llm::LanguageModel;
use crate::prompt::{build_prompt, SYSTEM_INSTRUCTIONS};
use crate::store::SessionStore;

/// Result of a conversational turn.
#[derive(Debug, Clone)]
pub struct Reply {
    /// The assistant's answer.
    pub answer: String,
    /// The session transcript right after this exchange was appended.
    pub transcript: Vec<Turn>,
}

/// Answers queries within the context of a session's prior turns.
pub struct ConversationEngine {
    store: Arc<dyn SessionStore>,
    model: Arc<dyn LanguageModel>,
    system_instructions: String,
}

impl ConversationEngine {
    pub fn new(store: Arc<dyn SessionStore>, model: Arc<dyn LanguageModel>) -> Self {
        Self {
            store,
            model,
            system_instructions: SYSTEM_INSTRUCTIONS.to_string(),
        }
    }

    pub fn with_system_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.system_instructions = instructions.into();
        self
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Answer `query` in the context of `session_id` and return the reply text.
    pub async fn process_query(
        &self,
        query: &str,
        session_id: &str,
    ) -> Result<String, ServiceError> {
        self.converse(query, session_id).await.map(|r| r.answer)
    }

    /// Answer `query` and also return the transcript as it stands after the
    /// exchange.
    ///
    /// The session's exchange lock is held from prompt assembly until both
    /// turns are appended, so concurrent queries on one session are
    /// serialized. Transcript readers are not blocked meanwhile. If the model
    /// call fails nothing is appended.
    pub async fn converse(&self, query: &str, session_id: &str) -> Result<Reply, ServiceError> {
        let session = self.store.get_or_create(session_id).await;
        let _exchange = session.begin_exchange().await;

        let prior = session.turns();
        let prompt = build_prompt(&self.system_instructions, &prior, query);
        debug!(
            session_id,
            prior_turns = prior.len(),
            query_len = query.len(),
            "Processing query"
        );

        let answer = match self.model.generate(&prompt, session_id).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!(session_id, error = %e, "Language model call failed");
                return Err(e);
            }
        };

        let transcript = session.push_exchange(Turn::user(query), Turn::assistant(answer.clone()));

        Ok(Reply { answer, transcript })
    }
}
