//! Recap Messaging Service
//!
//! Outbound delivery to the chat platform with support for:
//! - Gateway HTTP client for production delivery
//! - Mock messenger for testing and development
//! - Reply delivery bound to a webhook event's reply token
//! - Push delivery usable after the reply window has closed

pub mod client;
pub mod mock;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MessagingError {
    #[error("Messaging configuration error: {0}")]
    Configuration(String),

    #[error("Messaging request error: {0}")]
    Request(String),

    #[error("Messaging response error: {0}")]
    Response(String),
}

/// Messaging service configuration.
#[derive(Clone)]
pub struct MessagingConfig {
    /// Messaging provider (gateway, mock)
    pub provider: String,
    /// Channel access token for authenticating with the gateway
    pub access_token: String,
    /// Base URL for the messaging gateway API
    pub base_url: String,
}

impl std::fmt::Debug for MessagingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessagingConfig")
            .field("provider", &self.provider)
            .field("access_token", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl MessagingConfig {
    /// Create messaging config from environment variables.
    pub fn from_env() -> Result<Self, MessagingError> {
        dotenvy::dotenv().ok();

        let provider = std::env::var("MESSAGING_PROVIDER").unwrap_or_else(|_| "mock".to_string());

        let access_token = std::env::var("CHANNEL_ACCESS_TOKEN").unwrap_or_else(|_| {
            if provider == "mock" {
                "mock-access-token".to_string()
            } else {
                String::new()
            }
        });

        let base_url = std::env::var("MESSAGING_BASE_URL")
            .unwrap_or_else(|_| "https://api.recap-gateway.dev".to_string());

        if provider != "mock" && access_token.is_empty() {
            return Err(MessagingError::Configuration(
                "CHANNEL_ACCESS_TOKEN is required for gateway provider".to_string(),
            ));
        }

        Ok(Self {
            provider,
            access_token,
            base_url,
        })
    }
}

/// Messenger service trait for different implementations.
///
/// `reply` is only valid while the triggering webhook event's reply window
/// is open; background work must use `push`.
#[async_trait::async_trait]
pub trait MessengerService: Send + Sync {
    /// Send a reply bound to a webhook event's reply token.
    async fn reply(&self, reply_token: &str, text: &str) -> Result<(), MessagingError>;

    /// Push a message to a conversation, independent of any inbound event.
    async fn push(&self, conversation_id: &str, text: &str) -> Result<(), MessagingError>;
}

/// Factory for creating MessengerService implementations.
pub struct MessagingServiceFactory;

impl MessagingServiceFactory {
    /// Create a MessengerService based on configuration.
    pub fn create(config: MessagingConfig) -> Result<Box<dyn MessengerService>, MessagingError> {
        match config.provider.as_str() {
            "gateway" => {
                tracing::info!("Creating gateway messenger service");
                if config.access_token.is_empty() {
                    return Err(MessagingError::Configuration(
                        "CHANNEL_ACCESS_TOKEN is required for gateway provider".to_string(),
                    ));
                }
                Ok(Box::new(client::GatewayMessenger::new(config)))
            }
            "mock" => {
                tracing::info!("Creating mock messenger service");
                Ok(Box::new(mock::MockMessenger::new()))
            }
            provider => Err(MessagingError::Configuration(format!(
                "Unknown messaging provider: {}. Supported providers: gateway, mock",
                provider
            ))),
        }
    }
}
