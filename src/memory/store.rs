//! Conversation history storage
//!
//! Append-only, order-preserving message logs. There is no summarization,
//! truncation or eviction: a session's history grows for the life of the
//! process.

use crate::models::ModelMessage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of a message sender
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    Human,
    Ai,
}

/// A single message in the conversation history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub message_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub role: MessageRole,
    pub content: String,
}

impl ConversationMessage {
    pub fn new(role: MessageRole, content: String) -> Self {
        Self {
            message_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            role,
            content,
        }
    }
}

/// Conversation history for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionHistory {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    messages: Vec<ConversationMessage>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self {
            created_at: Utc::now(),
            updated_at: Utc::now(),
            messages: Vec::new(),
        }
    }

    /// Append a message. Messages are immutable once appended.
    pub fn add_message(&mut self, message: ConversationMessage) {
        self.messages.push(message);
        self.updated_at = Utc::now();
    }

    /// Iterate over all messages in insertion order
    pub fn messages(&self) -> impl Iterator<Item = &ConversationMessage> {
        self.messages.iter()
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Render the history as model messages for the next turn's context
    pub fn to_model_messages(&self) -> Vec<ModelMessage> {
        self.messages
            .iter()
            .map(|msg| match msg.role {
                MessageRole::Human => ModelMessage::user(msg.content.clone()),
                MessageRole::Ai => ModelMessage::assistant(msg.content.clone(), Vec::new()),
            })
            .collect()
    }
}

impl Default for SessionHistory {
    fn default() -> Self {
        Self::new()
    }
}
