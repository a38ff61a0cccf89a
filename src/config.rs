//! Process configuration
//!
//! Built once at startup from the environment (after `.env` is loaded)
//! and handed by reference to the inference client and the server.

use crate::error::GatewayError;
use crate::Result;

/// Hosted text-generation model the gateway talks to
pub const DEFAULT_ENDPOINT: &str =
    "https://api-inference.huggingface.co/models/mistralai/Mistral-7B-v0.1";

pub const DEFAULT_PORT: u16 = 8080;

#[derive(Clone)]
pub struct GatewayConfig {
    pub endpoint_url: String,
    /// Bearer token; `None` sends the request unauthenticated
    pub api_token: Option<String>,
    pub port: u16,
}

impl GatewayConfig {
    pub fn new(endpoint_url: impl Into<String>, api_token: Option<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            api_token,
            port: DEFAULT_PORT,
        }
    }

    /// Read `API_TOKEN`, `INFERENCE_ENDPOINT` and `PORT`/`API_PORT`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_token = non_empty("API_TOKEN");
        let endpoint_url = non_empty("INFERENCE_ENDPOINT")
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let port = match non_empty("PORT").or_else(|| non_empty("API_PORT")) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| {
                GatewayError::Config(format!("invalid port {:?}: {}", raw, e))
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            endpoint_url,
            api_token,
            port,
        })
    }
}

// Keeps the token out of logs.
impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("endpoint_url", &self.endpoint_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("port", &self.port)
            .finish()
    }
}
