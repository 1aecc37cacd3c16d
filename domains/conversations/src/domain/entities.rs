//! Domain entities for the Conversations domain
//!
//! A conversation is a tracked group chat identified by the opaque id the
//! chat platform assigns. Its buffered messages are ordered by a
//! per-conversation sequence number; its settings carry the digest threshold.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use recap_common::{Error, Result};

/// Digest threshold applied to conversations that never configured one
pub const DEFAULT_DIGEST_THRESHOLD: i64 = 50;

/// Maximum author display name length (varchar(200))
const MAX_AUTHOR_LENGTH: usize = 200;

/// A message buffered for a future digest.
///
/// Immutable once appended; removed only by a full-conversation clear or
/// delete. Empty text is accepted and stored as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct BufferedMessage {
    pub id: Uuid,
    pub conversation_id: String,
    pub author: String,
    pub text: String,
    pub sequence: i64,
    pub created_at: DateTime<Utc>,
}

impl BufferedMessage {
    /// Create a new buffered message
    pub fn new(
        conversation_id: String,
        author: String,
        text: String,
        sequence: i64,
    ) -> Result<Self> {
        if conversation_id.is_empty() {
            return Err(Error::Validation(
                "Conversation id is required".to_string(),
            ));
        }

        if author.trim().is_empty() {
            return Err(Error::Validation(
                "Author display name is required".to_string(),
            ));
        }
        if author.len() > MAX_AUTHOR_LENGTH {
            return Err(Error::Validation(format!(
                "Author must be at most {} characters",
                MAX_AUTHOR_LENGTH
            )));
        }

        Self::validate_sequence(sequence)?;

        Ok(BufferedMessage {
            id: Uuid::new_v4(),
            conversation_id,
            author,
            text,
            sequence,
            created_at: Utc::now(),
        })
    }

    /// Validate sequence (CHECK (sequence >= 1))
    fn validate_sequence(sequence: i64) -> Result<()> {
        if sequence < 1 {
            return Err(Error::Validation(
                "Message sequence must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Per-conversation settings, currently just the digest threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ConversationSettings {
    pub conversation_id: String,
    pub digest_threshold: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConversationSettings {
    /// Create settings for a newly seen conversation with the default threshold
    pub fn new(conversation_id: String) -> Result<Self> {
        if conversation_id.is_empty() {
            return Err(Error::Validation(
                "Conversation id is required".to_string(),
            ));
        }

        let now = Utc::now();
        Ok(ConversationSettings {
            conversation_id,
            digest_threshold: DEFAULT_DIGEST_THRESHOLD,
            created_at: now,
            updated_at: now,
        })
    }

    /// Validate a digest threshold (INV: threshold >= 1)
    pub fn validate_threshold(threshold: i64) -> Result<()> {
        if threshold < 1 {
            return Err(Error::Validation(
                "Digest threshold must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Update the digest threshold after validation
    pub fn set_threshold(&mut self, threshold: i64) -> Result<()> {
        Self::validate_threshold(threshold)?;
        self.digest_threshold = threshold;
        self.updated_at = Utc::now();
        Ok(())
    }
}
