//! Bounded-retry decorator for transient store faults
//!
//! Wraps any `ConversationStore` and retries operations that fail with a
//! database error, up to a fixed attempt budget with a short backoff.
//! Validation errors pass through untouched.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use recap_common::Result;

use crate::domain::entities::BufferedMessage;
use crate::store::ConversationStore;

const MAX_ATTEMPTS: u32 = 3;
const BACKOFF: Duration = Duration::from_millis(50);

/// Store decorator that retries transient database faults.
pub struct RetryingStore<S> {
    inner: S,
    max_attempts: u32,
    backoff: Duration,
}

impl<S: ConversationStore> RetryingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            max_attempts: MAX_ATTEMPTS,
            backoff: BACKOFF,
        }
    }

    /// Override the attempt budget and backoff, used in tests.
    pub fn with_policy(inner: S, max_attempts: u32, backoff: Duration) -> Self {
        Self {
            inner,
            max_attempts,
            backoff,
        }
    }

    async fn run<T, F, Fut>(&self, operation: &str, f: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;
        loop {
            match f().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < self.max_attempts => {
                    tracing::warn!(
                        operation = %operation,
                        attempt = attempt,
                        error = %err,
                        "Transient store fault, retrying"
                    );
                    tokio::time::sleep(self.backoff).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[async_trait]
impl<S: ConversationStore> ConversationStore for RetryingStore<S> {
    async fn append(
        &self,
        conversation_id: &str,
        author: &str,
        text: &str,
    ) -> Result<BufferedMessage> {
        self.run("append", || self.inner.append(conversation_id, author, text))
            .await
    }

    async fn messages(&self, conversation_id: &str) -> Result<Vec<BufferedMessage>> {
        self.run("messages", || self.inner.messages(conversation_id))
            .await
    }

    async fn clear(&self, conversation_id: &str) -> Result<()> {
        self.run("clear", || self.inner.clear(conversation_id)).await
    }

    async fn threshold(&self, conversation_id: &str) -> Result<i64> {
        self.run("threshold", || self.inner.threshold(conversation_id))
            .await
    }

    async fn set_threshold(&self, conversation_id: &str, threshold: i64) -> Result<()> {
        self.run("set_threshold", || {
            self.inner.set_threshold(conversation_id, threshold)
        })
        .await
    }

    async fn reset(&self, conversation_id: &str) -> Result<()> {
        self.run("reset", || self.inner.reset(conversation_id)).await
    }

    async fn delete(&self, conversation_id: &str) -> Result<()> {
        self.run("delete", || self.inner.delete(conversation_id))
            .await
    }
}
