//! Shared utilities, configuration, and error handling for Recap
//!
//! This crate provides common functionality used across the Recap application:
//! - Configuration management following 12-factor principles
//! - Error types and handling
//! - Webhook signature crypto
//! - State machine error types

pub mod config;
pub mod crypto;
pub mod error;
pub mod state;

pub use config::Config;
pub use crypto::{sign_body, verify_signature};
pub use error::{Error, Result};
pub use state::StateError;
