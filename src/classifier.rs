//! Input Classifier
//!
//! Sorts a user message into one of:
//! - Empty: nothing but whitespace
//! - Greeting: a salutation, answered without calling the model
//! - StockRelated: mentions stock market terminology, forwarded to the model
//! - OffTopic: everything else, refused

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Empty,
    Greeting,
    StockRelated,
    OffTopic,
}

/// Static keyword lists, lowercase, matched as raw substrings
pub const GREETING_KEYWORDS: &[&str] = &[
    "hello", "hi", "hey", "greetings", "good morning", "good afternoon",
    "good evening", "howdy", "good day",
];

pub const STOCK_KEYWORDS: &[&str] = &[
    // Instruments & venues
    "stock", "market", "share", "investment", "portfolio", "exchange",
    "trading", "equities", "securities", "dividend", "ipo",
    "etf", "mutual fund", "hedge fund", "index fund", "blue chip",
    "penny stock", "bull market", "bear market", "nasdaq", "dow jones",
    "s&p 500", "nyse", "brokerage", "capital gain", "bond", "asset",
    // Analysis
    "equity", "financial statement", "earnings report", "valuation",
    "price to earnings ratio", "market cap", "investment strategy",
    // Actions & positions
    "buy", "sell", "trade", "hold", "long position", "short position",
    "diversification", "risk management",
];

/// Keyword-based input classifier
pub struct InputClassifier;

impl InputClassifier {
    /// Empty first, then Greeting, then StockRelated
    pub fn classify(input: &str) -> Category {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Category::Empty;
        }

        let text = trimmed.to_lowercase();

        if contains_any(&text, GREETING_KEYWORDS) {
            Category::Greeting
        } else if Self::is_stock_related(&text) {
            Category::StockRelated
        } else {
            Category::OffTopic
        }
    }

    pub fn is_stock_related(input: &str) -> bool {
        contains_any(&input.to_lowercase(), STOCK_KEYWORDS)
    }
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| text.contains(kw))
}
