//! Mock Summarizer Implementation
//!
//! Records invocations and returns scripted results for test assertions.
//! Thread-safe via `Arc<Mutex<>>`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use recap_conversations::BufferedMessage;

use crate::summarizer::{Summarizer, SummarizerError};

/// Mock summarizer that records transcripts for test assertions.
#[derive(Debug, Clone)]
pub struct MockSummarizer {
    invocations: Arc<Mutex<Vec<Vec<BufferedMessage>>>>,
    response: Arc<Mutex<Option<String>>>,
    delay: Arc<Mutex<Option<Duration>>>,
    fail: Arc<AtomicBool>,
}

impl MockSummarizer {
    /// Create a new mock summarizer.
    pub fn new() -> Self {
        Self {
            invocations: Arc::new(Mutex::new(Vec::new())),
            response: Arc::new(Mutex::new(None)),
            delay: Arc::new(Mutex::new(None)),
            fail: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Return all recorded transcripts, in invocation order.
    pub fn recorded_invocations(&self) -> Vec<Vec<BufferedMessage>> {
        self.invocations
            .lock()
            .expect("invocations lock poisoned — prior test panicked")
            .clone()
    }

    /// Script a fixed digest string for subsequent calls.
    pub fn set_response(&self, response: &str) {
        *self
            .response
            .lock()
            .expect("response lock poisoned — prior test panicked") = Some(response.to_string());
    }

    /// Make subsequent calls take this long, to hold a flight open.
    pub fn set_delay(&self, delay: Duration) {
        *self
            .delay
            .lock()
            .expect("delay lock poisoned — prior test panicked") = Some(delay);
    }

    /// Make subsequent calls fail until disabled again.
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

impl Default for MockSummarizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(&self, messages: &[BufferedMessage]) -> Result<String, SummarizerError> {
        tracing::debug!(
            message_count = messages.len(),
            "Mock summarizer: recording invocation"
        );

        let delay = *self
            .delay
            .lock()
            .map_err(|e| SummarizerError::Failed(format!("delay lock poisoned: {e}")))?;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.invocations
            .lock()
            .map_err(|e| SummarizerError::Failed(format!("invocations lock poisoned: {e}")))?
            .push(messages.to_vec());

        if self.fail.load(Ordering::SeqCst) {
            return Err(SummarizerError::Failed(
                "mock summarizer configured to fail".to_string(),
            ));
        }

        let scripted = self
            .response
            .lock()
            .map_err(|e| SummarizerError::Failed(format!("response lock poisoned: {e}")))?
            .clone();

        Ok(scripted.unwrap_or_else(|| format!("Digest of {} messages", messages.len())))
    }
}
