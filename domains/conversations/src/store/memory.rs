//! In-memory conversation store
//!
//! Backs tests and local development. Same get-or-create semantics as the
//! PostgreSQL store, held in a `tokio::sync::RwLock`.

use std::collections::HashMap;

use async_trait::async_trait;
use recap_common::Result;
use tokio::sync::RwLock;

use crate::domain::entities::{BufferedMessage, DEFAULT_DIGEST_THRESHOLD};
use crate::store::ConversationStore;

#[derive(Debug, Default)]
struct ConversationRecord {
    messages: Vec<BufferedMessage>,
    threshold: Option<i64>,
    next_sequence: i64,
}

impl ConversationRecord {
    fn new() -> Self {
        Self {
            messages: Vec::new(),
            threshold: None,
            next_sequence: 1,
        }
    }
}

/// In-memory conversation store for tests and local development.
#[derive(Debug, Default)]
pub struct MemoryConversationStore {
    conversations: RwLock<HashMap<String, ConversationRecord>>,
}

impl MemoryConversationStore {
    pub fn new() -> Self {
        Self {
            conversations: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl ConversationStore for MemoryConversationStore {
    async fn append(
        &self,
        conversation_id: &str,
        author: &str,
        text: &str,
    ) -> Result<BufferedMessage> {
        let mut conversations = self.conversations.write().await;
        let record = conversations
            .entry(conversation_id.to_string())
            .or_insert_with(ConversationRecord::new);

        let msg = BufferedMessage::new(
            conversation_id.to_string(),
            author.to_string(),
            text.to_string(),
            record.next_sequence,
        )?;
        record.next_sequence += 1;
        record.messages.push(msg.clone());

        Ok(msg)
    }

    async fn messages(&self, conversation_id: &str) -> Result<Vec<BufferedMessage>> {
        let conversations = self.conversations.read().await;
        Ok(conversations
            .get(conversation_id)
            .map(|r| r.messages.clone())
            .unwrap_or_default())
    }

    async fn clear(&self, conversation_id: &str) -> Result<()> {
        let mut conversations = self.conversations.write().await;
        if let Some(record) = conversations.get_mut(conversation_id) {
            record.messages.clear();
        }
        Ok(())
    }

    async fn threshold(&self, conversation_id: &str) -> Result<i64> {
        let conversations = self.conversations.read().await;
        Ok(conversations
            .get(conversation_id)
            .and_then(|r| r.threshold)
            .unwrap_or(DEFAULT_DIGEST_THRESHOLD))
    }

    async fn set_threshold(&self, conversation_id: &str, threshold: i64) -> Result<()> {
        let mut conversations = self.conversations.write().await;
        let record = conversations
            .entry(conversation_id.to_string())
            .or_insert_with(ConversationRecord::new);
        record.threshold = Some(threshold);
        Ok(())
    }

    async fn reset(&self, conversation_id: &str) -> Result<()> {
        let mut conversations = self.conversations.write().await;
        conversations.insert(conversation_id.to_string(), ConversationRecord::new());
        Ok(())
    }

    async fn delete(&self, conversation_id: &str) -> Result<()> {
        let mut conversations = self.conversations.write().await;
        conversations.remove(conversation_id);
        Ok(())
    }
}
