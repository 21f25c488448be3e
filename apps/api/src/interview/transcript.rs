//! Append-only chat transcript.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptMessage {
    pub role: Role,
    /// Markdown as shown in the chat widget.
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Every exchanged message in arrival order. There is no way to remove a
/// single message; the whole log goes away only with the session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<TranscriptMessage>,
}

impl Transcript {
    pub fn push(&mut self, role: Role, content: impl Into<String>) -> &TranscriptMessage {
        self.messages.push(TranscriptMessage {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        });
        &self.messages[self.messages.len() - 1]
    }

    /// Read-only replay of the log, oldest first.
    pub fn replay(&self) -> impl Iterator<Item = &TranscriptMessage> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
