//! Recap LLM Service
//!
//! Provides text completion for digest generation with support for:
//! - Anthropic Messages API integration for production
//! - Mock LLM service for testing and development
//! - Configurable provider, model, and token budget

pub mod anthropic;
pub mod mock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("LLM configuration error: {0}")]
    Configuration(String),

    #[error("LLM request error: {0}")]
    Request(String),

    #[error("LLM response error: {0}")]
    Response(String),

    #[error("LLM rate limit exceeded")]
    RateLimit,
}

/// Role of a message in a completion conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmRole {
    User,
    Assistant,
}

/// A single message in a completion conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmMessage {
    pub role: LlmRole,
    pub content: String,
}

/// A completion request sent to the LLM service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model identifier; empty string means "use the service default"
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    pub messages: Vec<LlmMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// A completion response returned by the LLM service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub content: String,
    pub model: String,
    pub input_tokens: i32,
    pub output_tokens: i32,
    pub stop_reason: String,
}

/// LLM service configuration.
#[derive(Clone)]
pub struct LlmConfig {
    /// LLM provider (anthropic, mock)
    pub provider: String,
    /// API key for the Anthropic Messages API
    pub api_key: String,
    /// Optional base URL override (used in tests)
    pub base_url: Option<String>,
    /// Model used when a request does not name one
    pub default_model: String,
    /// Token budget for completions
    pub max_tokens: u32,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("default_model", &self.default_model)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl LlmConfig {
    /// Create LLM config from environment variables.
    pub fn from_env() -> Result<Self, LlmError> {
        dotenvy::dotenv().ok();

        let provider = std::env::var("LLM_PROVIDER").unwrap_or_else(|_| "mock".to_string());

        let api_key = std::env::var("ANTHROPIC_API_KEY").unwrap_or_default();

        let base_url = std::env::var("ANTHROPIC_BASE_URL").ok();

        let default_model = std::env::var("LLM_MODEL")
            .unwrap_or_else(|_| "claude-sonnet-4-5-20250929".to_string());

        let max_tokens = std::env::var("LLM_MAX_TOKENS")
            .unwrap_or_else(|_| "1024".to_string())
            .parse()
            .unwrap_or(1024);

        if provider != "mock" && api_key.is_empty() {
            return Err(LlmError::Configuration(
                "ANTHROPIC_API_KEY is required for Anthropic provider".to_string(),
            ));
        }

        Ok(Self {
            provider,
            api_key,
            base_url,
            default_model,
            max_tokens,
        })
    }
}

/// LLM service trait for different implementations.
#[async_trait::async_trait]
pub trait LlmService: Send + Sync {
    /// Run a completion request and return the generated text.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Return the default model identifier for this service.
    fn default_model(&self) -> &str;
}

/// Factory for creating LlmService implementations.
pub struct LlmServiceFactory;

impl LlmServiceFactory {
    /// Create an LlmService based on configuration.
    pub fn create(config: LlmConfig) -> Result<Box<dyn LlmService>, LlmError> {
        match config.provider.as_str() {
            "anthropic" => {
                tracing::info!("Creating Anthropic LLM service");
                if config.api_key.is_empty() {
                    return Err(LlmError::Configuration(
                        "ANTHROPIC_API_KEY is required for Anthropic provider".to_string(),
                    ));
                }
                Ok(Box::new(anthropic::AnthropicService::new(config)))
            }
            "mock" => {
                tracing::info!("Creating mock LLM service");
                Ok(Box::new(mock::MockLlmService::new()))
            }
            provider => Err(LlmError::Configuration(format!(
                "Unknown LLM provider: {}. Supported providers: anthropic, mock",
                provider
            ))),
        }
    }
}
