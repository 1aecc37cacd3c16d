//! Conversation store trait and implementations
//!
//! The store is the single source of truth for buffered messages and digest
//! settings. All implementations use get-or-create semantics: the first write
//! to a never-seen conversation id creates it with the default threshold.

pub mod memory;
pub mod postgres;
pub mod retry;

use async_trait::async_trait;
use recap_common::Result;

use crate::domain::entities::BufferedMessage;

/// Durable per-conversation state: ordered message log plus digest threshold.
///
/// Individual operations are atomic; nothing here spans a read-then-write
/// sequence in a transaction. The digest engine layers its own single-flight
/// guard on top.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Append a message to a conversation's buffer, creating the
    /// conversation with the default threshold if it does not exist.
    async fn append(
        &self,
        conversation_id: &str,
        author: &str,
        text: &str,
    ) -> Result<BufferedMessage>;

    /// Read the full buffered message list in arrival order.
    async fn messages(&self, conversation_id: &str) -> Result<Vec<BufferedMessage>>;

    /// Empty a conversation's buffer. Settings are untouched. Idempotent.
    async fn clear(&self, conversation_id: &str) -> Result<()>;

    /// Current digest threshold; the default for never-configured conversations.
    async fn threshold(&self, conversation_id: &str) -> Result<i64>;

    /// Persist a digest threshold, creating the conversation if needed.
    /// Callers validate the threshold before reaching the store.
    async fn set_threshold(&self, conversation_id: &str, threshold: i64) -> Result<()>;

    /// Join semantics: purge messages and settings, recreate with defaults.
    async fn reset(&self, conversation_id: &str) -> Result<()>;

    /// Leave semantics: purge messages and settings together. Idempotent.
    async fn delete(&self, conversation_id: &str) -> Result<()>;
}
