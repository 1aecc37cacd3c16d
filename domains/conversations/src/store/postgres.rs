//! PostgreSQL conversation store

use async_trait::async_trait;
use recap_common::Result;
use sqlx::PgPool;

use crate::domain::entities::{BufferedMessage, ConversationSettings, DEFAULT_DIGEST_THRESHOLD};
use crate::store::ConversationStore;

#[derive(Clone)]
pub struct PgConversationStore {
    pool: PgPool,
}

impl PgConversationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Ensure a conversation row exists, defaulting the threshold
    async fn get_or_create(&self, conversation_id: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO conversations (conversation_id, digest_threshold, created_at, updated_at)
            VALUES ($1, $2, NOW(), NOW())
            ON CONFLICT (conversation_id) DO NOTHING
            "#,
        )
        .bind(conversation_id)
        .bind(DEFAULT_DIGEST_THRESHOLD)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get the next sequence number for a conversation
    async fn next_sequence(&self, conversation_id: &str) -> Result<i64> {
        let row = sqlx::query_scalar::<_, Option<i64>>(
            "SELECT MAX(sequence) FROM buffered_messages WHERE conversation_id = $1",
        )
        .bind(conversation_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.unwrap_or(0) + 1)
    }
}

#[async_trait]
impl ConversationStore for PgConversationStore {
    async fn append(
        &self,
        conversation_id: &str,
        author: &str,
        text: &str,
    ) -> Result<BufferedMessage> {
        self.get_or_create(conversation_id).await?;

        let sequence = self.next_sequence(conversation_id).await?;
        let msg = BufferedMessage::new(
            conversation_id.to_string(),
            author.to_string(),
            text.to_string(),
            sequence,
        )?;

        let created = sqlx::query_as::<_, BufferedMessage>(
            r#"
            INSERT INTO buffered_messages (
                id, conversation_id, author, text, sequence, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, conversation_id, author, text, sequence, created_at
            "#,
        )
        .bind(msg.id)
        .bind(&msg.conversation_id)
        .bind(&msg.author)
        .bind(&msg.text)
        .bind(msg.sequence)
        .bind(msg.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn messages(&self, conversation_id: &str) -> Result<Vec<BufferedMessage>> {
        let messages = sqlx::query_as::<_, BufferedMessage>(
            r#"
            SELECT id, conversation_id, author, text, sequence, created_at
            FROM buffered_messages
            WHERE conversation_id = $1
            ORDER BY sequence ASC
            "#,
        )
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    async fn clear(&self, conversation_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM buffered_messages WHERE conversation_id = $1")
            .bind(conversation_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn threshold(&self, conversation_id: &str) -> Result<i64> {
        let settings = sqlx::query_as::<_, ConversationSettings>(
            r#"
            SELECT conversation_id, digest_threshold, created_at, updated_at
            FROM conversations
            WHERE conversation_id = $1
            "#,
        )
        .bind(conversation_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(settings
            .map(|s| s.digest_threshold)
            .unwrap_or(DEFAULT_DIGEST_THRESHOLD))
    }

    async fn set_threshold(&self, conversation_id: &str, threshold: i64) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO conversations (conversation_id, digest_threshold, created_at, updated_at)
            VALUES ($1, $2, NOW(), NOW())
            ON CONFLICT (conversation_id)
            DO UPDATE SET digest_threshold = $2, updated_at = NOW()
            "#,
        )
        .bind(conversation_id)
        .bind(threshold)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn reset(&self, conversation_id: &str) -> Result<()> {
        self.delete(conversation_id).await?;
        self.get_or_create(conversation_id).await?;
        Ok(())
    }

    async fn delete(&self, conversation_id: &str) -> Result<()> {
        // buffered_messages rows go with the conversation via ON DELETE CASCADE
        sqlx::query("DELETE FROM conversations WHERE conversation_id = $1")
            .bind(conversation_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
