//! Webhooks domain state

use std::sync::Arc;

use crate::dispatcher::Dispatcher;

/// Application state for the webhook HTTP surface
#[derive(Clone)]
pub struct WebhooksState {
    pub dispatcher: Arc<Dispatcher>,
    /// Shared secret used to verify inbound signatures
    pub channel_secret: String,
}
