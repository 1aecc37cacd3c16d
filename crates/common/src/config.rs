//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config. Service credentials (LLM,
//! messaging gateway) live in the respective service crate configs.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database connection URL (PostgreSQL)
    pub database_url: String,

    /// Channel secret used to verify inbound webhook signatures
    pub channel_secret: String,

    /// Conversation store provider (postgres, memory)
    pub store_provider: String,

    /// Runtime configuration
    pub log_level: String,
    pub rust_log: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let store_provider =
            env::var("STORE_PROVIDER").unwrap_or_else(|_| "postgres".to_string());

        let config = Self {
            database_url: match store_provider.as_str() {
                // The in-memory store never touches the database
                "memory" => env::var("DATABASE_URL").unwrap_or_default(),
                _ => env::var("DATABASE_URL")
                    .map_err(|_| anyhow::anyhow!("DATABASE_URL is required"))?,
            },

            channel_secret: env::var("CHANNEL_SECRET")
                .map_err(|_| anyhow::anyhow!("CHANNEL_SECRET is required"))?,

            store_provider,

            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "recap=debug".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
        };

        Ok(config)
    }
}
