//! Common test utilities and fixtures for integration tests
//!
//! Builds the full webhook router over the in-memory store with mock
//! summarizer and messenger services, plus helpers for signing request
//! bodies and waiting on detached flush tasks.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use recap_common::sign_body;
use recap_conversations::MemoryConversationStore;
use recap_digests::{DigestEngine, MockSummarizer};
use recap_messaging::mock::MockMessenger;
use recap_webhooks::api::{routes, WebhooksState};
use recap_webhooks::Dispatcher;

pub const TEST_CHANNEL_SECRET: &str = "test-channel-secret";

/// Full application wired over in-memory and mock collaborators.
#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryConversationStore>,
    pub summarizer: MockSummarizer,
    pub messenger: MockMessenger,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryConversationStore::new());
        let summarizer = MockSummarizer::new();
        let messenger = MockMessenger::new();

        let engine = Arc::new(DigestEngine::new(
            store.clone(),
            Arc::new(summarizer.clone()),
            Arc::new(messenger.clone()),
        ));
        let dispatcher = Arc::new(Dispatcher::new(
            store.clone(),
            engine,
            Arc::new(messenger.clone()),
        ));

        let state = WebhooksState {
            dispatcher,
            channel_secret: TEST_CHANNEL_SECRET.to_string(),
        };

        Self {
            router: routes().with_state(state),
            store,
            summarizer,
            messenger,
        }
    }

    /// POST a correctly signed webhook body.
    pub async fn post_webhook(&self, body: &serde_json::Value) -> StatusCode {
        let raw = serde_json::to_vec(body).expect("test body serializes");
        let signature = sign_body(TEST_CHANNEL_SECRET, &raw);
        self.post_webhook_raw(raw, Some(&signature)).await
    }

    /// POST a raw body with an arbitrary (or missing) signature header.
    pub async fn post_webhook_raw(&self, raw: Vec<u8>, signature: Option<&str>) -> StatusCode {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/webhook")
            .header("content-type", "application/json");
        if let Some(signature) = signature {
            builder = builder.header("x-recap-signature", signature);
        }
        let request = builder.body(Body::from(raw)).expect("request builds");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router handles request");
        response.status()
    }
}

/// One message event in platform wire format.
#[allow(dead_code)]
pub fn message_event(conversation_id: &str, author: &str, text: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "message",
        "source": { "conversation_id": conversation_id },
        "reply_token": format!("token-{}", author.to_lowercase()),
        "sender": { "display_name": author },
        "message": { "text": text }
    })
}

/// A webhook envelope wrapping the given events.
#[allow(dead_code)]
pub fn envelope(events: Vec<serde_json::Value>) -> serde_json::Value {
    serde_json::json!({ "events": events })
}

/// Poll a condition until it holds, or fail after a bounded wait.
/// Flush tasks run detached, so tests have nothing to await directly.
#[allow(dead_code)]
pub async fn eventually<F, Fut>(mut condition: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    for _ in 0..400 {
        if condition().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not met within timeout");
}
