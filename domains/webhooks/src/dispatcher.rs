//! Inbound event dispatcher
//!
//! One dispatcher is constructed at startup and routes each inbound event
//! explicitly by kind. Store failures on this synchronous path become a
//! user-facing "try again later" reply; reply delivery itself is best
//! effort because the platform response is already committed.

use std::sync::Arc;

use recap_common::{Error, Result};
use recap_conversations::ConversationStore;
use recap_digests::{DigestEngine, IngestOutcome, TriggerOutcome};
use recap_digests::notices;
use recap_messaging::MessengerService;

use crate::commands::{self, ParsedMessage};
use crate::domain::entities::{EventKind, InboundEvent};

/// Routes inbound platform events to the store, engine, and messenger.
pub struct Dispatcher {
    store: Arc<dyn ConversationStore>,
    engine: Arc<DigestEngine>,
    messenger: Arc<dyn MessengerService>,
}

impl Dispatcher {
    pub fn new(
        store: Arc<dyn ConversationStore>,
        engine: Arc<DigestEngine>,
        messenger: Arc<dyn MessengerService>,
    ) -> Self {
        Self {
            store,
            engine,
            messenger,
        }
    }

    /// Handle one inbound event.
    pub async fn dispatch(&self, event: &InboundEvent) -> Result<()> {
        let conversation_id = &event.source.conversation_id;
        match event.kind {
            EventKind::Message => self.handle_message_event(event).await,
            EventKind::Join => self.handle_join(conversation_id, event.reply_token.as_deref()).await,
            EventKind::Leave => self.handle_leave(conversation_id).await,
            EventKind::Unknown => {
                tracing::debug!(
                    conversation_id = %conversation_id,
                    "Skipping unhandled event kind"
                );
                Ok(())
            }
        }
    }

    async fn handle_message_event(&self, event: &InboundEvent) -> Result<()> {
        let conversation_id = &event.source.conversation_id;
        let reply_token = event.reply_token.as_deref();

        let text = event
            .message
            .as_ref()
            .map(|m| m.text.as_str())
            .ok_or_else(|| Error::Validation("Message event without message body".to_string()))?;

        match commands::parse(text) {
            ParsedMessage::Conversational => {
                let author = event
                    .sender
                    .as_ref()
                    .map(|s| s.display_name.as_str())
                    .unwrap_or("Unknown");

                match self.engine.handle_message(conversation_id, author, text).await {
                    Ok(IngestOutcome::Buffered { count, threshold }) => {
                        self.reply_best_effort(reply_token, &notices::buffered(count, threshold))
                            .await;
                    }
                    Ok(IngestOutcome::Summarizing { count }) => {
                        self.reply_best_effort(reply_token, &notices::summarizing(count))
                            .await;
                    }
                    Ok(IngestOutcome::FlushInProgress) => {
                        self.reply_best_effort(reply_token, &notices::flush_in_progress())
                            .await;
                    }
                    Err(err) if err.is_transient() => {
                        tracing::error!(
                            conversation_id = %conversation_id,
                            error = %err,
                            "Store unavailable while buffering message"
                        );
                        self.reply_best_effort(reply_token, &notices::try_again_later())
                            .await;
                    }
                    Err(err) => return Err(err),
                }
            }
            ParsedMessage::SetThreshold(threshold) => {
                match self.engine.set_threshold(conversation_id, threshold).await {
                    Ok(()) => {
                        self.reply_best_effort(reply_token, &notices::threshold_updated(threshold))
                            .await;
                    }
                    Err(err) => {
                        tracing::error!(
                            conversation_id = %conversation_id,
                            error = %err,
                            "Failed to persist threshold"
                        );
                        self.reply_best_effort(reply_token, &notices::try_again_later())
                            .await;
                    }
                }
            }
            ParsedMessage::InvalidThreshold => {
                self.reply_best_effort(reply_token, &notices::invalid_threshold())
                    .await;
            }
            ParsedMessage::Digest => match self.engine.trigger_flush(conversation_id) {
                TriggerOutcome::Scheduled => {
                    self.reply_best_effort(reply_token, &notices::digest_scheduled())
                        .await;
                }
                TriggerOutcome::FlushInProgress => {
                    self.reply_best_effort(reply_token, &notices::flush_in_progress())
                        .await;
                }
            },
            ParsedMessage::Unknown => {
                self.reply_best_effort(reply_token, &notices::usage()).await;
            }
        }

        Ok(())
    }

    /// Joining (or re-joining) a conversation starts it from a clean slate.
    async fn handle_join(&self, conversation_id: &str, reply_token: Option<&str>) -> Result<()> {
        tracing::info!(conversation_id = %conversation_id, "Joined conversation");

        match self.store.reset(conversation_id).await {
            Ok(()) => {
                self.reply_best_effort(reply_token, &notices::greeting()).await;
            }
            Err(err) => {
                tracing::error!(
                    conversation_id = %conversation_id,
                    error = %err,
                    "Failed to reset conversation on join"
                );
                self.reply_best_effort(reply_token, &notices::try_again_later())
                    .await;
            }
        }

        Ok(())
    }

    /// Leaving erases all stored data; no reply, the audience is gone.
    async fn handle_leave(&self, conversation_id: &str) -> Result<()> {
        tracing::info!(conversation_id = %conversation_id, "Left conversation, deleting data");
        self.store.delete(conversation_id).await
    }

    async fn reply_best_effort(&self, reply_token: Option<&str>, text: &str) {
        let Some(token) = reply_token else {
            tracing::debug!("No reply token on event, skipping acknowledgment");
            return;
        };
        if let Err(err) = self.messenger.reply(token, text).await {
            tracing::error!(error = %err, "Reply delivery failed");
        }
    }
}
