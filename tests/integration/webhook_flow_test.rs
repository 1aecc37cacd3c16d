//! Webhook surface integration tests
//!
//! Drives the axum router end to end: signature verification, envelope
//! parsing, command handling, and membership events.

mod common;

use axum::http::StatusCode;
use common::{envelope, message_event, TestApp, TEST_CHANNEL_SECRET};
use recap_common::sign_body;
use recap_conversations::ConversationStore;

#[tokio::test]
async fn test_valid_signature_is_accepted() {
    let app = TestApp::new();

    let status = app
        .post_webhook(&envelope(vec![message_event("group-1", "Alice", "hello")]))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.store.messages("group-1").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_missing_signature_is_rejected() {
    let app = TestApp::new();
    let raw = serde_json::to_vec(&envelope(vec![message_event("group-1", "Alice", "hello")]))
        .unwrap();

    let status = app.post_webhook_raw(raw, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(app.store.messages("group-1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_tampered_body_is_rejected() {
    let app = TestApp::new();
    let original = serde_json::to_vec(&envelope(vec![message_event(
        "group-1", "Alice", "hello",
    )]))
    .unwrap();
    let signature = sign_body(TEST_CHANNEL_SECRET, &original);

    let tampered = serde_json::to_vec(&envelope(vec![message_event(
        "group-1",
        "Alice",
        "hacked",
    )]))
    .unwrap();

    let status = app.post_webhook_raw(tampered, Some(&signature)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(app.store.messages("group-1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_wrong_secret_is_rejected() {
    let app = TestApp::new();
    let raw = serde_json::to_vec(&envelope(vec![message_event("group-1", "Alice", "hello")]))
        .unwrap();
    let signature = sign_body("some-other-secret", &raw);

    let status = app.post_webhook_raw(raw, Some(&signature)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_body_with_valid_signature_is_bad_request() {
    let app = TestApp::new();
    let raw = b"not json at all".to_vec();
    let signature = sign_body(TEST_CHANNEL_SECRET, &raw);

    let status = app.post_webhook_raw(raw, Some(&signature)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_batch_of_events_is_processed_in_order() {
    let app = TestApp::new();

    let status = app
        .post_webhook(&envelope(vec![
            message_event("group-1", "Alice", "first"),
            message_event("group-1", "Bob", "second"),
        ]))
        .await;

    assert_eq!(status, StatusCode::OK);
    let messages = app.store.messages("group-1").await.unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].text, "first");
    assert_eq!(messages[1].text, "second");
}

#[tokio::test]
async fn test_unhandled_event_kind_does_not_fail_the_batch() {
    let app = TestApp::new();

    let status = app
        .post_webhook(&envelope(vec![
            serde_json::json!({
                "type": "sticker",
                "source": { "conversation_id": "group-1" }
            }),
            message_event("group-1", "Alice", "hello"),
        ]))
        .await;

    assert_eq!(status, StatusCode::OK);
    // The valid message in the same delivery was still processed
    let messages = app.store.messages("group-1").await.unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].text, "hello");
}

#[tokio::test]
async fn test_threshold_command_round_trip() {
    let app = TestApp::new();

    app.post_webhook(&envelope(vec![message_event(
        "group-1",
        "Alice",
        "!threshold 5",
    )]))
    .await;

    assert_eq!(app.store.threshold("group-1").await.unwrap(), 5);

    let replies = app.messenger.recorded_replies();
    assert_eq!(replies.len(), 1);
    assert!(replies[0].text.contains("5"));
}

#[tokio::test]
async fn test_non_numeric_threshold_keeps_previous_value() {
    let app = TestApp::new();
    app.store.set_threshold("group-1", 10).await.unwrap();

    app.post_webhook(&envelope(vec![message_event(
        "group-1",
        "Alice",
        "!threshold soon",
    )]))
    .await;

    assert_eq!(app.store.threshold("group-1").await.unwrap(), 10);
    let replies = app.messenger.recorded_replies();
    assert!(replies[0].text.contains("at least 1"));
}

#[tokio::test]
async fn test_join_event_resets_conversation() {
    let app = TestApp::new();
    app.store.append("group-1", "Alice", "before").await.unwrap();
    app.store.set_threshold("group-1", 7).await.unwrap();

    let status = app
        .post_webhook(&envelope(vec![serde_json::json!({
            "type": "join",
            "source": { "conversation_id": "group-1" },
            "reply_token": "token-join"
        })]))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(app.store.messages("group-1").await.unwrap().is_empty());
    assert_eq!(app.store.threshold("group-1").await.unwrap(), 50);

    let replies = app.messenger.recorded_replies();
    assert_eq!(replies[0].target, "token-join");
    assert!(replies[0].text.contains("!threshold"));
}

#[tokio::test]
async fn test_leave_event_deletes_all_data_silently() {
    let app = TestApp::new();
    app.store.append("group-1", "Alice", "before").await.unwrap();
    app.store.set_threshold("group-1", 7).await.unwrap();

    let status = app
        .post_webhook(&envelope(vec![serde_json::json!({
            "type": "leave",
            "source": { "conversation_id": "group-1" }
        })]))
        .await;

    assert_eq!(status, StatusCode::OK);
    // Reads as never-seen afterwards
    assert!(app.store.messages("group-1").await.unwrap().is_empty());
    assert_eq!(app.store.threshold("group-1").await.unwrap(), 50);
    assert!(app.messenger.recorded_replies().is_empty());
    assert!(app.messenger.recorded_pushes().is_empty());
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = TestApp::new();

    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
