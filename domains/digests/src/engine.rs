//! Buffering and trigger engine
//!
//! `handle_message` appends to the store, re-reads current state, and decides
//! between a buffered acknowledgment and a threshold-triggered flush. The
//! flush itself runs as a detached task so the webhook handler can return a
//! fast acknowledgment; nothing awaits it, and its failures surface only
//! through the push channel and tracing.
//!
//! Every decision re-reads the store; the engine keeps no per-conversation
//! data between invocations except the flight registry, which guarantees at
//! most one flush per conversation at a time.

use std::sync::Arc;

use recap_common::Result;
use recap_conversations::{ConversationSettings, ConversationStore};
use recap_messaging::MessengerService;

use crate::flight::{FlightPermit, FlightRegistry};
use crate::notices;
use crate::summarizer::Summarizer;

/// Outcome of ingesting one conversational message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Below threshold; message stored, nothing else happens.
    Buffered { count: usize, threshold: i64 },
    /// Threshold crossed; a flush task has been scheduled.
    Summarizing { count: usize },
    /// Threshold crossed, but a flush is already running for this conversation.
    FlushInProgress,
}

/// Outcome of an on-demand digest request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// A flush task has been scheduled.
    Scheduled,
    /// A flush is already running for this conversation.
    FlushInProgress,
}

/// The buffering and threshold-trigger engine.
pub struct DigestEngine {
    store: Arc<dyn ConversationStore>,
    summarizer: Arc<dyn Summarizer>,
    messenger: Arc<dyn MessengerService>,
    flights: FlightRegistry,
}

impl DigestEngine {
    pub fn new(
        store: Arc<dyn ConversationStore>,
        summarizer: Arc<dyn Summarizer>,
        messenger: Arc<dyn MessengerService>,
    ) -> Self {
        Self {
            store,
            summarizer,
            messenger,
            flights: FlightRegistry::new(),
        }
    }

    /// Ingest one conversational message.
    ///
    /// Appends to the store, re-reads the buffered count and the threshold,
    /// and schedules a detached flush when the count reaches the threshold.
    pub async fn handle_message(
        &self,
        conversation_id: &str,
        author: &str,
        text: &str,
    ) -> Result<IngestOutcome> {
        self.store.append(conversation_id, author, text).await?;

        let count = self.store.messages(conversation_id).await?.len();
        let threshold = self.store.threshold(conversation_id).await?;

        if (count as i64) < threshold {
            tracing::debug!(
                conversation_id = %conversation_id,
                count = count,
                threshold = threshold,
                "Message buffered below threshold"
            );
            return Ok(IngestOutcome::Buffered { count, threshold });
        }

        match self.flights.begin(conversation_id) {
            Some(permit) => {
                tracing::info!(
                    conversation_id = %conversation_id,
                    count = count,
                    threshold = threshold,
                    "Threshold crossed, scheduling flush"
                );
                self.spawn_flush(conversation_id, permit);
                Ok(IngestOutcome::Summarizing { count })
            }
            None => {
                tracing::debug!(
                    conversation_id = %conversation_id,
                    "Threshold crossed but a flush is already in flight"
                );
                Ok(IngestOutcome::FlushInProgress)
            }
        }
    }

    /// Request an immediate digest, independent of the threshold.
    pub fn trigger_flush(&self, conversation_id: &str) -> TriggerOutcome {
        match self.flights.begin(conversation_id) {
            Some(permit) => {
                tracing::info!(conversation_id = %conversation_id, "On-demand flush scheduled");
                self.spawn_flush(conversation_id, permit);
                TriggerOutcome::Scheduled
            }
            None => TriggerOutcome::FlushInProgress,
        }
    }

    /// Persist a new digest threshold after validating the invariant.
    pub async fn set_threshold(&self, conversation_id: &str, threshold: i64) -> Result<()> {
        ConversationSettings::validate_threshold(threshold)?;
        self.store.set_threshold(conversation_id, threshold).await
    }

    /// Spawn the detached flush task. The permit travels with the task and
    /// releases on every exit path.
    fn spawn_flush(&self, conversation_id: &str, permit: FlightPermit) {
        let store = self.store.clone();
        let summarizer = self.summarizer.clone();
        let messenger = self.messenger.clone();
        let conversation_id = conversation_id.to_string();

        tokio::spawn(async move {
            run_flush(store, summarizer, messenger, conversation_id, permit).await;
        });
    }
}

/// One flush: re-read the buffer, summarize, push, clear.
///
/// The buffer is preserved when summarization fails and cleared once
/// summarization succeeds, regardless of push delivery outcome.
async fn run_flush(
    store: Arc<dyn ConversationStore>,
    summarizer: Arc<dyn Summarizer>,
    messenger: Arc<dyn MessengerService>,
    conversation_id: String,
    _permit: FlightPermit,
) {
    // Re-read instead of reusing the count-check list; the buffer may have
    // grown since the trigger.
    let messages = match store.messages(&conversation_id).await {
        Ok(messages) => messages,
        Err(err) => {
            tracing::error!(
                conversation_id = %conversation_id,
                error = %err,
                "Flush aborted: could not read buffer"
            );
            return;
        }
    };

    if messages.is_empty() {
        push_best_effort(&*messenger, &conversation_id, &notices::nothing_to_digest()).await;
        return;
    }

    let summary = match summarizer.summarize(&messages).await {
        Ok(summary) => summary,
        Err(err) => {
            tracing::warn!(
                conversation_id = %conversation_id,
                error = %err,
                "Summarization failed, buffer preserved"
            );
            push_best_effort(&*messenger, &conversation_id, &notices::digest_failed()).await;
            return;
        }
    };

    tracing::info!(
        conversation_id = %conversation_id,
        message_count = messages.len(),
        "Digest produced, delivering"
    );

    push_best_effort(&*messenger, &conversation_id, &notices::digest(&summary)).await;

    // Cleared even when the push failed; see DESIGN.md for the decision.
    if let Err(err) = store.clear(&conversation_id).await {
        tracing::error!(
            conversation_id = %conversation_id,
            error = %err,
            "Failed to clear buffer after digest"
        );
    }
}

/// Push delivery from the background task is best effort; failures are
/// logged, never propagated.
async fn push_best_effort(messenger: &dyn MessengerService, conversation_id: &str, text: &str) {
    if let Err(err) = messenger.push(conversation_id, text).await {
        tracing::error!(
            conversation_id = %conversation_id,
            error = %err,
            "Push delivery failed"
        );
    }
}
