//! Session registry
//!
//! Keyed lookup of conversation histories, created on first reference and
//! retained for the process lifetime. The registry is owned by the
//! orchestrator's caller and passed by handle rather than read from global
//! state. Turns on the same session key serialize on a per-session gate;
//! distinct keys are fully independent.

use crate::memory::store::{ConversationMessage, MessageRole, SessionHistory};
use crate::models::ModelMessage;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard, RwLock};

/// Handle to one session's history and turn gate
pub struct SessionHandle {
    key: String,
    turn_gate: Mutex<()>,
    history: RwLock<SessionHistory>,
}

impl SessionHandle {
    fn new(key: String) -> Self {
        Self {
            key,
            turn_gate: Mutex::new(()),
            history: RwLock::new(SessionHistory::new()),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Acquire the turn gate. Held for the whole compose → model → dispatch
    /// → finalize sequence so same-key turns cannot interleave.
    pub async fn lock_turn(&self) -> MutexGuard<'_, ()> {
        self.turn_gate.lock().await
    }

    /// Render the current history as model messages
    pub async fn to_model_messages(&self) -> Vec<ModelMessage> {
        self.history.read().await.to_model_messages()
    }

    /// Record one completed turn: the human question, then the ai answer.
    pub async fn append_turn(&self, question: &str, answer: &str) {
        let mut history = self.history.write().await;
        history.add_message(ConversationMessage::new(
            MessageRole::Human,
            question.to_string(),
        ));
        history.add_message(ConversationMessage::new(MessageRole::Ai, answer.to_string()));
    }

    pub async fn message_count(&self) -> usize {
        self.history.read().await.message_count()
    }

    pub async fn snapshot(&self) -> Vec<ConversationMessage> {
        self.history.read().await.messages().cloned().collect()
    }
}

/// Registry of all live sessions
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, Arc<SessionHandle>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Look up a session by key, creating it if absent. Invoked fresh on
    /// every turn; this lookup is the sole mechanism for cross-turn memory.
    pub async fn get_or_create(&self, key: &str) -> Arc<SessionHandle> {
        {
            let sessions = self.sessions.read().await;
            if let Some(handle) = sessions.get(key) {
                return handle.clone();
            }
        }

        let mut sessions = self.sessions.write().await;
        sessions
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(SessionHandle::new(key.to_string())))
            .clone()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
