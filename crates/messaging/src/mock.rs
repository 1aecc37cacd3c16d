//! Mock Messenger Implementation
//!
//! Stores delivered messages in memory for test assertions.
//! Thread-safe via `Arc<Mutex<>>`.

use crate::{MessagingError, MessengerService};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// A recorded outbound message.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedMessage {
    /// Reply token or conversation id, depending on the channel
    pub target: String,
    pub text: String,
}

/// Mock messenger that records replies and pushes for test assertions.
#[derive(Debug, Clone)]
pub struct MockMessenger {
    replies: Arc<Mutex<Vec<RecordedMessage>>>,
    pushes: Arc<Mutex<Vec<RecordedMessage>>>,
    fail_pushes: Arc<AtomicBool>,
}

impl MockMessenger {
    /// Create a new mock messenger.
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(Vec::new())),
            pushes: Arc::new(Mutex::new(Vec::new())),
            fail_pushes: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Return all recorded replies.
    pub fn recorded_replies(&self) -> Vec<RecordedMessage> {
        self.replies
            .lock()
            .expect("replies lock poisoned — prior test panicked")
            .clone()
    }

    /// Return all recorded pushes.
    pub fn recorded_pushes(&self) -> Vec<RecordedMessage> {
        self.pushes
            .lock()
            .expect("pushes lock poisoned — prior test panicked")
            .clone()
    }

    /// Make subsequent `push` calls fail until disabled again.
    pub fn set_fail_pushes(&self, fail: bool) {
        self.fail_pushes.store(fail, Ordering::SeqCst);
    }

    /// Clear all recorded messages.
    pub fn reset(&self) {
        self.replies
            .lock()
            .expect("replies lock poisoned — prior test panicked")
            .clear();
        self.pushes
            .lock()
            .expect("pushes lock poisoned — prior test panicked")
            .clear();
    }
}

impl Default for MockMessenger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl MessengerService for MockMessenger {
    async fn reply(&self, reply_token: &str, text: &str) -> Result<(), MessagingError> {
        tracing::debug!(reply_token = %reply_token, "Mock messenger: recording reply");
        self.replies
            .lock()
            .map_err(|e| MessagingError::Request(format!("replies lock poisoned: {e}")))?
            .push(RecordedMessage {
                target: reply_token.to_string(),
                text: text.to_string(),
            });
        Ok(())
    }

    async fn push(&self, conversation_id: &str, text: &str) -> Result<(), MessagingError> {
        if self.fail_pushes.load(Ordering::SeqCst) {
            return Err(MessagingError::Response(
                "mock messenger configured to fail pushes".to_string(),
            ));
        }

        tracing::debug!(conversation_id = %conversation_id, "Mock messenger: recording push");
        self.pushes
            .lock()
            .map_err(|e| MessagingError::Request(format!("pushes lock poisoned: {e}")))?
            .push(RecordedMessage {
                target: conversation_id.to_string(),
                text: text.to_string(),
            });
        Ok(())
    }
}
