//! In-memory conversation transcript.
//!
//! Append-only and unbounded — the transcript lives as long as its
//! owning assistant and is only emptied by an explicit clear. Callers
//! get a read-only slice view, never a handle they could mutate.

use chrono::Local;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn of the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub message: String,
    pub timestamp: String,
}

impl Turn {
    pub fn new(role: Role, message: &str) -> Self {
        Self {
            role,
            message: message.to_string(),
            timestamp: Local::now().to_rfc3339(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ConversationLog {
    turns: Vec<Turn>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Read view of the full transcript, in append order.
    pub fn history(&self) -> &[Turn] {
        &self.turns
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
