//! Inbound webhook envelope and event types

use serde::{Deserialize, Serialize};

/// Kind of inbound platform event
///
/// The platform delivers event kinds this bot does not handle (stickers,
/// reactions, ...) in the same batch as ones it does; those parse as
/// `Unknown` and are skipped instead of failing the whole envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Message,
    Join,
    Leave,
    #[serde(other)]
    Unknown,
}

/// Conversation the event originated from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSource {
    pub conversation_id: String,
}

/// Sender attribution carried by message events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSender {
    pub display_name: String,
}

/// Message payload carried by message events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMessage {
    pub text: String,
}

/// One inbound event from the chat platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub source: EventSource,
    /// Present when the platform allows a synchronous reply to this event
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<EventSender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<EventMessage>,
}

/// Top-level webhook body: a batch of events delivered together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookEnvelope {
    pub events: Vec<InboundEvent>,
}
