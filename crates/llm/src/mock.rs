//! Mock LLM Service Implementation
//!
//! Used by `LlmServiceFactory` when provider is `"mock"`, and by tests that
//! need to see exactly what reached the completion service. Records every
//! request and can be scripted with a fixed digest; by default it echoes the
//! transcript it was given so callers can assert their prompt made it
//! through intact.

use std::sync::{Arc, Mutex};

use crate::{CompletionRequest, CompletionResponse, LlmError, LlmService};

const MOCK_MODEL: &str = "mock-digest-model";

/// Mock LLM service that records requests and returns scripted digests.
#[derive(Debug, Clone)]
pub struct MockLlmService {
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
    response: Arc<Mutex<Option<String>>>,
}

impl MockLlmService {
    pub fn new() -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            response: Arc::new(Mutex::new(None)),
        }
    }

    /// Return all recorded completion requests, in call order.
    pub fn recorded_requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .expect("requests lock poisoned — prior test panicked")
            .clone()
    }

    /// Script a fixed digest string for subsequent completions.
    pub fn set_response(&self, response: &str) {
        *self
            .response
            .lock()
            .expect("response lock poisoned — prior test panicked") = Some(response.to_string());
    }
}

impl Default for MockLlmService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LlmService for MockLlmService {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        tracing::debug!(
            message_count = request.messages.len(),
            "Mock LLM service recording completion request"
        );

        let model = if request.model.is_empty() {
            MOCK_MODEL.to_string()
        } else {
            request.model.clone()
        };

        // Unscripted completions echo the transcript they were asked to
        // digest, so tests can assert prompt construction end to end
        let transcript = request
            .messages
            .last()
            .map(|m| m.content.as_str())
            .unwrap_or_default();

        let scripted = self
            .response
            .lock()
            .map_err(|e| LlmError::Response(format!("response lock poisoned: {e}")))?
            .clone();
        let content = scripted.unwrap_or_else(|| format!("Digest: {}", transcript));

        let input_tokens = request
            .messages
            .iter()
            .map(|m| m.content.split_whitespace().count() as i32)
            .sum::<i32>();
        let output_tokens = content.split_whitespace().count() as i32;

        self.requests
            .lock()
            .map_err(|e| LlmError::Response(format!("requests lock poisoned: {e}")))?
            .push(request);

        Ok(CompletionResponse {
            content,
            model,
            input_tokens,
            output_tokens,
            stop_reason: "end_turn".to_string(),
        })
    }

    fn default_model(&self) -> &str {
        MOCK_MODEL
    }
}
