//! Summarizer trait and the LLM-backed implementation
//!
//! The engine depends only on the trait; production wires in
//! `LlmSummarizer`, tests use `MockSummarizer` from this crate.

use std::sync::Arc;

use recap_conversations::BufferedMessage;
use recap_llm::{CompletionRequest, LlmMessage, LlmRole, LlmService};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SummarizerError {
    #[error("Summarization failed: {0}")]
    Failed(String),
}

/// Produces a single digest string from an ordered transcript.
/// May fail; no latency bound.
#[async_trait::async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, messages: &[BufferedMessage]) -> Result<String, SummarizerError>;
}

const DIGEST_SYSTEM_PROMPT: &str = "You are a group-chat digest assistant. \
Summarize the following chat transcript into a short digest. \
Mention who discussed what, keep the original language of the chat, \
and do not invent content that is not in the transcript.";

/// Format an ordered transcript as `author: text` lines.
pub fn format_transcript(messages: &[BufferedMessage]) -> String {
    messages
        .iter()
        .map(|m| format!("{}: {}", m.author, m.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Summarizer backed by the LLM completion service.
pub struct LlmSummarizer {
    llm: Arc<dyn LlmService>,
}

impl LlmSummarizer {
    pub fn new(llm: Arc<dyn LlmService>) -> Self {
        Self { llm }
    }
}

#[async_trait::async_trait]
impl Summarizer for LlmSummarizer {
    async fn summarize(&self, messages: &[BufferedMessage]) -> Result<String, SummarizerError> {
        let transcript = format_transcript(messages);

        tracing::debug!(message_count = messages.len(), "Requesting digest completion");

        let request = CompletionRequest {
            model: String::new(),
            system_prompt: Some(DIGEST_SYSTEM_PROMPT.to_string()),
            messages: vec![LlmMessage {
                role: LlmRole::User,
                content: transcript,
            }],
            max_tokens: None,
        };

        let response = self
            .llm
            .complete(request)
            .await
            .map_err(|e| SummarizerError::Failed(e.to_string()))?;

        Ok(response.content)
    }
}
