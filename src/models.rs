//! Core data models for the chatbot

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

//
// ================= Messages =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Bot,
}

/// One line of the transcript. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: MessageRole,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

impl Message {
    pub fn new(role: MessageRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            sent_at: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageRole::User, text)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(MessageRole::Bot, text)
    }
}

//
// ================= Inference =================
//

/// Wire body for the hosted model: `{"inputs": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceRequest {
    #[serde(rename = "inputs")]
    pub prompt_text: String,
}

impl InferenceRequest {
    pub fn new(prompt_text: impl Into<String>) -> Self {
        Self {
            prompt_text: prompt_text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InferenceResult {
    Success(String),
    Failure(String),
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MessageRole::User => "You",
            MessageRole::Bot => "Bot",
        };
        write!(f, "{}", s)
    }
}
