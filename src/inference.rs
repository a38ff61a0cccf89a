//! Remote inference client
//!
//! Sends one prompt to the hosted text-generation endpoint and reports the
//! first candidate's `generated_text`, or a failure reason. Errors never
//! leave this module as `Err`: they are logged and folded into
//! `InferenceResult::Failure`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{error, info};

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::models::{InferenceRequest, InferenceResult};
use crate::Result;

/// Seam between the gateway and whatever produces generated text
#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn infer(&self, prompt_text: &str) -> InferenceResult;
}

/// Hosted inference API client (HuggingFace style)
pub struct HuggingFaceClient {
    client: Client,
    endpoint_url: String,
    api_token: Option<String>,
}

impl HuggingFaceClient {
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let client = Client::builder().build()?;

        Ok(Self {
            client,
            endpoint_url: config.endpoint_url.clone(),
            api_token: config.api_token.clone(),
        })
    }

    async fn generate(&self, prompt_text: &str) -> Result<String> {
        let mut request = self
            .client
            .post(&self.endpoint_url)
            .json(&InferenceRequest::new(prompt_text));

        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let candidates: Vec<GenerationCandidate> = response
            .json()
            .await
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;

        candidates
            .into_iter()
            .next()
            .and_then(|c| c.generated_text)
            .ok_or_else(|| GatewayError::MalformedResponse("no generated text".to_string()))
    }
}

#[async_trait]
impl InferenceClient for HuggingFaceClient {
    async fn infer(&self, prompt_text: &str) -> InferenceResult {
        info!("Calling inference endpoint");

        match self.generate(prompt_text).await {
            Ok(text) => {
                info!(chars = text.len(), "Inference response received");
                InferenceResult::Success(text)
            }
            Err(e) => {
                error!("Inference request failed: {}", e);
                InferenceResult::Failure(e.to_string())
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerationCandidate {
    generated_text: Option<String>,
}
