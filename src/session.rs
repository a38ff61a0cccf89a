//! Chat session state
//!
//! The transcript is owned by the caller. `send_message` is the explicit
//! submit handler: it takes the current history and the raw input field,
//! and hands back the updated history plus the new input-field value.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::gateway::Gateway;
use crate::models::{Message, MessageRole};

/// Ordered, append-only transcript
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChatHistory {
    messages: Vec<Message>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.messages.push(Message::user(text));
    }

    pub fn push_bot(&mut self, text: impl Into<String>) {
        self.messages.push(Message::bot(text));
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// One `You: ...` / `Bot: ...` line per message
    pub fn transcript(&self) -> String {
        self.messages
            .iter()
            .map(|m| format!("{}: {}", m.role, m.text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Result of one submission
#[derive(Debug, Clone)]
pub struct SendOutcome {
    pub history: ChatHistory,
    /// Value the input field should be reset to
    pub input: String,
}

pub async fn send_message(gateway: &Gateway, mut history: ChatHistory, input: &str) -> SendOutcome {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return SendOutcome {
            history,
            input: trimmed.to_string(),
        };
    }

    history.push_user(trimmed);
    let answer = gateway.respond(trimmed).await;
    history.push_bot(answer);

    info!(messages = history.len(), "Exchange appended to history");

    SendOutcome {
        history,
        input: String::new(),
    }
}
