//! Conversational gateway
//!
//! classify → (early return for empty / greeting / off-topic) → infer → shape
//!
//! At most one outbound call per `respond`, awaited to completion.
//! History is not touched here; see `session`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::classifier::{Category, InputClassifier};
use crate::inference::InferenceClient;
use crate::models::InferenceResult;
use crate::shaper;

pub const EMPTY_INPUT_REPLY: &str = "Please enter a message.";
pub const GREETING_REPLY: &str = "Hello! How can I assist you with stock market information today?";
pub const OFF_TOPIC_REPLY: &str = "I can only chat about stock markets.";
pub const FAILURE_REPLY: &str = "Failed to get a response from the AI.";

/// Gateway answer plus the category that produced it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reply {
    pub category: Category,
    pub answer: String,
}

#[derive(Clone)]
pub struct Gateway {
    client: Arc<dyn InferenceClient>,
}

impl Gateway {
    pub fn new(client: Arc<dyn InferenceClient>) -> Self {
        Self { client }
    }

    pub async fn respond(&self, input: &str) -> String {
        self.reply(input).await.answer
    }

    pub async fn reply(&self, input: &str) -> Reply {
        let category = InputClassifier::classify(input);
        debug!(?category, "Classified input");

        let answer = match category {
            Category::Empty => EMPTY_INPUT_REPLY.to_string(),
            Category::Greeting => GREETING_REPLY.to_string(),
            Category::OffTopic => OFF_TOPIC_REPLY.to_string(),
            Category::StockRelated => {
                match self.client.infer(&build_prompt(input)).await {
                    InferenceResult::Success(text) => shaper::shape(&text),
                    InferenceResult::Failure(reason) => {
                        warn!("Inference failed, returning fallback reply: {}", reason);
                        FAILURE_REPLY.to_string()
                    }
                }
            }
        };

        Reply { category, answer }
    }
}

/// Wrap the user's question in the answer-priming instruction
pub fn build_prompt(input: &str) -> String {
    format!(
        "My short, relevant and concise answer to your {} question regarding stock market information:\n",
        input
    )
}
