//! Generative inference capability for catalog structuring
//!
//! The acquisition pipeline treats inference strictly as `prompt -> text`
//! with unspecified latency. The capability may be unavailable (no API key
//! configured); acquisition then degrades to an empty catalog.

use deprewatch_core::InferenceConfig;
use serde::{Deserialize, Serialize};

/// Errors from the inference capability
#[derive(Debug, Clone, thiserror::Error)]
pub enum InferenceError {
    #[error("no inference model available: {0}")]
    NoModelAvailable(String),

    #[error("inference request failed: {0}")]
    Transport(String),

    #[error("inference API error: {0}")]
    Api(String),
}

/// Trait for text-completion capabilities
#[async_trait::async_trait]
pub trait InferenceProvider: Send + Sync {
    /// Complete `prompt` into response text
    async fn infer(&self, prompt: &str) -> Result<String, InferenceError>;
}

/// Anthropic Messages API request format
#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: usize,
    temperature: f32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

/// Anthropic Messages API response format
#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    text: String,
}

/// Inference provider backed by the Anthropic Messages API
pub struct AnthropicProvider {
    config: InferenceConfig,
    api_key: String,
    client: reqwest::Client,
}

impl AnthropicProvider {
    /// Create a provider, reading the API key from the configured
    /// environment variable.
    ///
    /// A missing or empty key is [`InferenceError::NoModelAvailable`]: the
    /// capability is absent, and acquisition proceeds with zero records.
    pub fn from_env(config: InferenceConfig) -> Result<Self, InferenceError> {
        let api_key = std::env::var(&config.api_key_env).unwrap_or_default();
        if api_key.is_empty() {
            return Err(InferenceError::NoModelAvailable(format!(
                "{} not set",
                config.api_key_env
            )));
        }

        Ok(Self {
            config,
            api_key,
            client: reqwest::Client::new(),
        })
    }
}

#[async_trait::async_trait]
impl InferenceProvider for AnthropicProvider {
    async fn infer(&self, prompt: &str) -> Result<String, InferenceError> {
        let request = AnthropicRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        let response = self
            .client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| InferenceError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(InferenceError::Api(format!(
                "status {}: {}",
                status, error_text
            )));
        }

        let api_response: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::Api(format!("unreadable response: {}", e)))?;

        api_response
            .content
            .first()
            .map(|c| c.text.clone())
            .ok_or_else(|| InferenceError::Api("empty response".to_string()))
    }
}

/// Stand-in provider for hosts with no inference capability configured.
///
/// Every call signals [`InferenceError::NoModelAvailable`], so acquisition
/// degrades to an empty catalog instead of failing activation.
pub struct UnavailableProvider {
    reason: String,
}

impl UnavailableProvider {
    /// Create a stand-in carrying the reason the capability is absent
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait::async_trait]
impl InferenceProvider for UnavailableProvider {
    async fn infer(&self, _prompt: &str) -> Result<String, InferenceError> {
        Err(InferenceError::NoModelAvailable(self.reason.clone()))
    }
}
