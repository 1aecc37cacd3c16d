//! Webhooks domain: inbound platform events, commands, dispatch
//!
//! The chat platform delivers signed event batches to `POST /webhook`.
//! Handlers verify the signature against the raw body, parse the envelope,
//! and hand each event to the dispatcher, which routes by kind into the
//! conversation store and the digest engine.

pub mod api;
pub mod commands;
pub mod dispatcher;
pub mod domain;

// Re-export domain types at the crate root for convenience
pub use commands::{parse, ParsedMessage};
pub use dispatcher::Dispatcher;
pub use domain::entities::{
    EventKind, EventMessage, EventSender, EventSource, InboundEvent, WebhookEnvelope,
};
