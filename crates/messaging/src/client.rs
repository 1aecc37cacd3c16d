//! Gateway HTTP Client Implementation
//!
//! Real HTTP client that POSTs outbound messages to the chat platform
//! gateway at `{base_url}/v1/messages/reply` and `{base_url}/v1/messages/push`.

use serde::Serialize;

use crate::{MessagingConfig, MessagingError, MessengerService};

#[derive(Debug, Serialize)]
struct ReplyBody<'a> {
    reply_token: &'a str,
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct PushBody<'a> {
    conversation_id: &'a str,
    text: &'a str,
}

/// Real gateway client for delivering messages to the chat platform.
pub struct GatewayMessenger {
    http: reqwest::Client,
    access_token: String,
    base_url: String,
}

impl GatewayMessenger {
    /// Create a new gateway messenger from configuration.
    pub fn new(config: MessagingConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            access_token: config.access_token,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<(), MessagingError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await
            .map_err(|e| MessagingError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read response body".to_string());
            return Err(MessagingError::Response(format!(
                "Gateway returned {}: {}",
                status, body
            )));
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl MessengerService for GatewayMessenger {
    async fn reply(&self, reply_token: &str, text: &str) -> Result<(), MessagingError> {
        self.post("/v1/messages/reply", &ReplyBody { reply_token, text })
            .await?;
        tracing::debug!("Reply delivered");
        Ok(())
    }

    async fn push(&self, conversation_id: &str, text: &str) -> Result<(), MessagingError> {
        self.post(
            "/v1/messages/push",
            &PushBody {
                conversation_id,
                text,
            },
        )
        .await?;
        tracing::debug!(conversation_id = %conversation_id, "Push delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: String) -> MessagingConfig {
        MessagingConfig {
            provider: "gateway".to_string(),
            access_token: "test-token".to_string(),
            base_url,
        }
    }

    #[tokio::test]
    async fn test_reply_posts_token_and_text() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/messages/reply"))
            .and(header("authorization", "Bearer test-token"))
            .and(body_json(serde_json::json!({
                "reply_token": "rt-123",
                "text": "saved"
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let messenger = GatewayMessenger::new(test_config(server.uri()));
        messenger.reply("rt-123", "saved").await.unwrap();
    }

    #[tokio::test]
    async fn test_push_posts_conversation_and_text() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/messages/push"))
            .and(body_json(serde_json::json!({
                "conversation_id": "group-1",
                "text": "digest ready"
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let messenger = GatewayMessenger::new(test_config(server.uri()));
        messenger.push("group-1", "digest ready").await.unwrap();
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/messages/push"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let messenger = GatewayMessenger::new(test_config(server.uri()));
        let err = messenger.push("group-1", "text").await.unwrap_err();

        let message = err.to_string();
        assert!(message.contains("502"));
        assert!(message.contains("bad gateway"));
    }

    #[tokio::test]
    async fn test_trailing_slash_in_base_url_is_trimmed() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/messages/reply"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let messenger = GatewayMessenger::new(test_config(format!("{}/", server.uri())));
        messenger.reply("rt", "text").await.unwrap();
    }
}
