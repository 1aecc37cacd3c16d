//! Webhook API handlers

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Serialize;

use recap_common::{verify_signature, Error, Result};

use crate::api::state::WebhooksState;
use crate::domain::entities::WebhookEnvelope;

pub const SIGNATURE_HEADER: &str = "x-recap-signature";

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Liveness probe
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Receive a signed webhook batch from the chat platform.
///
/// The signature is checked against the raw body before any parsing.
/// Events are dispatched in order; a failing event is logged and does
/// not fail the batch, so the platform never retries a half-processed
/// delivery.
pub async fn receive_webhook(
    State(state): State<WebhooksState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| Error::Authentication("Missing webhook signature".to_string()))?;

    if !verify_signature(&state.channel_secret, &body, signature) {
        return Err(Error::Authentication(
            "Invalid webhook signature".to_string(),
        ));
    }

    let envelope: WebhookEnvelope = serde_json::from_slice(&body)
        .map_err(|e| Error::Validation(format!("Malformed webhook body: {}", e)))?;

    tracing::debug!(event_count = envelope.events.len(), "Webhook batch accepted");

    for event in &envelope.events {
        if let Err(err) = state.dispatcher.dispatch(event).await {
            tracing::error!(
                conversation_id = %event.source.conversation_id,
                error = %err,
                "Event dispatch failed"
            );
        }
    }

    Ok(StatusCode::OK)
}
