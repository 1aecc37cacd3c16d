//! Route definitions for the webhook API

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;
use super::state::WebhooksState;

/// Create all webhook API routes
pub fn routes() -> Router<WebhooksState> {
    Router::new()
        .route("/webhook", post(handlers::receive_webhook))
        .route("/health", get(handlers::health))
}
