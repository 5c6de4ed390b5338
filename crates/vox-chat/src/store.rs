//! Session transcript storage.
//!
//! The map of sessions is guarded by a short-lived `RwLock`. Each session
//! carries an async exchange lock, held by a conversation turn across the
//! model call, and a separate transcript lock held only while turns are
//! copied or appended, so readers never wait on the model.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

use vox_core::types::Turn;

/// Shared handle to one session.
pub type SessionHandle = Arc<Session>;

/// A conversation transcript keyed by a caller-supplied identifier.
///
/// Turns can only be appended.
#[derive(Debug)]
pub struct Session {
    id: String,
    exchange: Mutex<()>,
    turns: RwLock<Vec<Turn>>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            exchange: Mutex::new(()),
            turns: RwLock::new(Vec::new()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Wait for exclusive use of the session for one query/reply exchange.
    pub async fn begin_exchange(&self) -> MutexGuard<'_, ()> {
        self.exchange.lock().await
    }

    /// Snapshot of the transcript.
    pub fn turns(&self) -> Vec<Turn> {
        self.turns
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.turns
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn push(&self, turn: Turn) {
        self.turns
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(turn);
    }

    /// Append a user turn and its reply together and return the resulting
    /// transcript. Readers see both turns or neither.
    pub fn push_exchange(&self, user: Turn, assistant: Turn) -> Vec<Turn> {
        let mut turns = self
            .turns
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        turns.push(user);
        turns.push(assistant);
        turns.clone()
    }
}

/// Storage backend for session transcripts.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Return the session for `session_id`, registering an empty one on first
    /// reference.
    async fn get_or_create(&self, session_id: &str) -> SessionHandle;

    /// Ordered turns of `session_id`, or an empty list if it was never seen.
    /// Does not create the session.
    async fn list_turns(&self, session_id: &str) -> Vec<Turn>;
}

/// Process-resident session store. Contents vanish on exit.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, SessionHandle>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions registered so far.
    pub fn session_count(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    fn lookup(&self, session_id: &str) -> Option<SessionHandle> {
        self.sessions
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(session_id)
            .cloned()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get_or_create(&self, session_id: &str) -> SessionHandle {
        if let Some(handle) = self.lookup(session_id) {
            return handle;
        }

        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        // Another request may have registered it between the two locks.
        Arc::clone(sessions.entry(session_id.to_string()).or_insert_with(|| {
            debug!(session_id, "Creating session");
            Arc::new(Session::new(session_id))
        }))
    }

    async fn list_turns(&self, session_id: &str) -> Vec<Turn> {
        match self.lookup(session_id) {
            Some(session) => session.turns(),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unseen_session_lists_empty() {
        let store = InMemorySessionStore::new();
        assert!(store.list_turns("never-seen").await.is_empty());
    }

    #[tokio::test]
    async fn test_list_turns_does_not_create() {
        let store = InMemorySessionStore::new();
        store.list_turns("ghost").await;
        assert_eq!(store.session_count(), 0);
    }

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let store = InMemorySessionStore::new();
        let first = store.get_or_create("s1").await;
        let second = store.get_or_create("s1").await;
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.session_count(), 1);
        assert_eq!(first.id(), "s1");
    }

    #[tokio::test]
    async fn test_turns_preserve_order() {
        let store = InMemorySessionStore::new();
        let session = store.get_or_create("s1").await;
        session.push(Turn::user("one"));
        session.push(Turn::assistant("two"));
        session.push(Turn::user("three"));
        let turns = store.list_turns("s1").await;
        let contents: Vec<_> = turns.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = InMemorySessionStore::new();
        store.get_or_create("a").await.push(Turn::user("for a"));
        store.get_or_create("b").await;

        assert_eq!(store.list_turns("a").await.len(), 1);
        assert!(store.list_turns("b").await.is_empty());
        assert_eq!(store.session_count(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_get_or_create_yields_one_session() {
        let store = Arc::new(InMemorySessionStore::new());
        let mut tasks = Vec::new();
        for _ in 0..16 {
            let store = Arc::clone(&store);
            tasks.push(tokio::spawn(async move { store.get_or_create("shared").await }));
        }
        let mut handles = Vec::new();
        for task in tasks {
            handles.push(task.await.unwrap());
        }
        assert_eq!(store.session_count(), 1);
        assert!(handles.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[test]
    fn test_session_accessors() {
        let session = Session::new("x");
        assert!(session.is_empty());
        session.push(Turn::user("hi"));
        assert_eq!(session.len(), 1);
        assert_eq!(session.turns()[0], Turn::user("hi"));

        let transcript = session.push_exchange(Turn::user("q"), Turn::assistant("a"));
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[2], Turn::assistant("a"));
    }

    #[tokio::test]
    async fn test_list_turns_during_exchange_does_not_wait() {
        let store = InMemorySessionStore::new();
        let session = store.get_or_create("s1").await;
        session.push(Turn::user("earlier"));

        let _exchange = session.begin_exchange().await;
        let turns = tokio::time::timeout(
            std::time::Duration::from_secs(1),
            store.list_turns("s1"),
        )
        .await
        .expect("list_turns blocked on an open exchange");
        assert_eq!(turns, vec![Turn::user("earlier")]);
    }

    #[tokio::test]
    async fn test_exchanges_are_exclusive() {
        let session = Session::new("x");
        let guard = session.begin_exchange().await;
        assert!(session.exchange.try_lock().is_err());
        drop(guard);
        assert!(session.exchange.try_lock().is_ok());
    }
}
