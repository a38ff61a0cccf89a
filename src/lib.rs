//! Stock Market Chatbot
//!
//! A small conversational gateway that:
//! - Answers greetings and refuses off-topic questions locally
//! - Forwards stock market questions to a hosted text-generation model
//! - Trims the generated answer to at most three sentences
//! - Keeps an in-memory, append-only transcript per chat session
//!
//! PIPELINE:
//! INPUT → CLASSIFY → (EARLY REPLY | INFER → SHAPE) → REPLY

pub mod api;
pub mod classifier;
pub mod config;
pub mod error;
pub mod gateway;
pub mod inference;
pub mod models;
pub mod session;
pub mod shaper;

pub use error::Result;

// Re-export common types
pub use models::*;
pub use classifier::{Category, InputClassifier};
pub use config::GatewayConfig;
pub use gateway::{Gateway, Reply};
pub use inference::{HuggingFaceClient, InferenceClient};
pub use session::{send_message, ChatHistory, SendOutcome};
