//! Digest lifecycle integration tests
//!
//! Exercises buffering, threshold triggering, on-demand digests, and
//! failure recovery through the full webhook surface.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use common::{envelope, eventually, message_event, TestApp};
use recap_conversations::ConversationStore;

#[tokio::test]
async fn test_messages_below_threshold_only_buffer() {
    let app = TestApp::new();
    app.store.set_threshold("group-1", 10).await.unwrap();

    for i in 0..9 {
        app.post_webhook(&envelope(vec![message_event(
            "group-1",
            "Alice",
            &format!("message {}", i),
        )]))
        .await;
    }

    assert_eq!(app.store.messages("group-1").await.unwrap().len(), 9);
    assert!(app.summarizer.recorded_invocations().is_empty());
    assert!(app.messenger.recorded_pushes().is_empty());

    // Every message got a buffering acknowledgment
    let replies = app.messenger.recorded_replies();
    assert_eq!(replies.len(), 9);
    assert!(replies[8].text.contains("9/10"));
}

#[tokio::test]
async fn test_threshold_crossing_digests_and_clears() {
    let app = TestApp::new();
    app.store.set_threshold("group-1", 3).await.unwrap();
    app.summarizer.set_response("They planned dinner for Friday.");

    for (author, text) in [("Alice", "dinner?"), ("Bob", "friday works"), ("Carol", "ok")] {
        app.post_webhook(&envelope(vec![message_event("group-1", author, text)]))
            .await;
    }

    let store = app.store.clone();
    eventually(|| {
        let store = store.clone();
        async move { store.messages("group-1").await.unwrap().is_empty() }
    })
    .await;

    // Summarizer saw the full transcript in order
    let invocations = app.summarizer.recorded_invocations();
    assert_eq!(invocations.len(), 1);
    let texts: Vec<&str> = invocations[0].iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec!["dinner?", "friday works", "ok"]);

    // Digest pushed to the conversation
    let pushes = app.messenger.recorded_pushes();
    assert_eq!(pushes.len(), 1);
    assert_eq!(pushes[0].target, "group-1");
    assert!(pushes[0].text.contains("They planned dinner for Friday."));

    // The crossing message was acknowledged as summarizing
    let replies = app.messenger.recorded_replies();
    assert!(replies[2].text.contains("digest of 3 messages"));
}

#[tokio::test]
async fn test_conversations_are_isolated() {
    let app = TestApp::new();
    app.store.set_threshold("group-1", 2).await.unwrap();

    app.post_webhook(&envelope(vec![
        message_event("group-1", "Alice", "a1"),
        message_event("group-2", "Bob", "b1"),
        message_event("group-1", "Alice", "a2"),
    ]))
    .await;

    let store = app.store.clone();
    eventually(|| {
        let store = store.clone();
        async move { store.messages("group-1").await.unwrap().is_empty() }
    })
    .await;

    // group-2 is untouched by group-1's flush
    assert_eq!(app.store.messages("group-2").await.unwrap().len(), 1);
    let invocations = app.summarizer.recorded_invocations();
    assert_eq!(invocations.len(), 1);
    assert!(invocations[0].iter().all(|m| m.conversation_id == "group-1"));
}

#[tokio::test]
async fn test_on_demand_digest_below_threshold() {
    let app = TestApp::new();

    app.post_webhook(&envelope(vec![message_event("group-1", "Alice", "just one")]))
        .await;
    let status = app
        .post_webhook(&envelope(vec![message_event("group-1", "Alice", "!digest")]))
        .await;
    assert_eq!(status, StatusCode::OK);

    let store = app.store.clone();
    eventually(|| {
        let store = store.clone();
        async move { store.messages("group-1").await.unwrap().is_empty() }
    })
    .await;

    assert_eq!(app.summarizer.recorded_invocations().len(), 1);
    let replies = app.messenger.recorded_replies();
    assert!(replies[1].text.contains("Preparing a digest"));
}

#[tokio::test]
async fn test_on_demand_digest_with_empty_buffer() {
    let app = TestApp::new();

    app.post_webhook(&envelope(vec![message_event("group-1", "Alice", "!digest")]))
        .await;

    let messenger = app.messenger.clone();
    eventually(|| {
        let messenger = messenger.clone();
        async move { !messenger.recorded_pushes().is_empty() }
    })
    .await;

    assert!(app.summarizer.recorded_invocations().is_empty());
    let pushes = app.messenger.recorded_pushes();
    assert!(pushes[0].text.contains("no messages to digest"));
}

#[tokio::test]
async fn test_duplicate_digest_request_while_flushing() {
    let app = TestApp::new();
    app.summarizer.set_delay(Duration::from_millis(200));

    app.post_webhook(&envelope(vec![message_event("group-1", "Alice", "hello")]))
        .await;
    app.post_webhook(&envelope(vec![
        message_event("group-1", "Alice", "!digest"),
        message_event("group-1", "Bob", "!digest"),
    ]))
    .await;

    let replies = app.messenger.recorded_replies();
    assert!(replies[1].text.contains("Preparing a digest"));
    assert!(replies[2].text.contains("already being prepared"));

    let summarizer = app.summarizer.clone();
    eventually(|| {
        let summarizer = summarizer.clone();
        async move { !summarizer.recorded_invocations().is_empty() }
    })
    .await;
    assert_eq!(app.summarizer.recorded_invocations().len(), 1);
}

#[tokio::test]
async fn test_summarizer_failure_keeps_buffer_for_next_attempt() {
    let app = TestApp::new();
    app.store.set_threshold("group-1", 2).await.unwrap();
    app.summarizer.set_fail(true);

    app.post_webhook(&envelope(vec![
        message_event("group-1", "Alice", "one"),
        message_event("group-1", "Bob", "two"),
    ]))
    .await;

    let messenger = app.messenger.clone();
    eventually(|| {
        let messenger = messenger.clone();
        async move { !messenger.recorded_pushes().is_empty() }
    })
    .await;

    let pushes = app.messenger.recorded_pushes();
    assert!(pushes[0].text.contains("Digest generation failed"));
    assert_eq!(app.store.messages("group-1").await.unwrap().len(), 2);

    // A later on-demand digest covers the preserved messages
    app.summarizer.set_fail(false);
    app.post_webhook(&envelope(vec![message_event("group-1", "Alice", "!digest")]))
        .await;

    let store = app.store.clone();
    eventually(|| {
        let store = store.clone();
        async move { store.messages("group-1").await.unwrap().is_empty() }
    })
    .await;

    let invocations = app.summarizer.recorded_invocations();
    assert_eq!(invocations.len(), 2);
    assert_eq!(invocations[1].len(), 2);
}

#[tokio::test]
async fn test_push_failure_still_clears_buffer() {
    let app = TestApp::new();
    app.store.set_threshold("group-1", 1).await.unwrap();
    app.messenger.set_fail_pushes(true);

    let status = app
        .post_webhook(&envelope(vec![message_event("group-1", "Alice", "hello")]))
        .await;
    assert_eq!(status, StatusCode::OK);

    let store = app.store.clone();
    eventually(|| {
        let store = store.clone();
        async move { store.messages("group-1").await.unwrap().is_empty() }
    })
    .await;

    assert_eq!(app.summarizer.recorded_invocations().len(), 1);
}

#[tokio::test]
async fn test_lowered_threshold_applies_to_next_message() {
    let app = TestApp::new();

    app.post_webhook(&envelope(vec![
        message_event("group-1", "Alice", "one"),
        message_event("group-1", "Bob", "two"),
    ]))
    .await;

    // Threshold drops below the current buffer size; the next
    // conversational message triggers the flush
    app.post_webhook(&envelope(vec![message_event(
        "group-1",
        "Alice",
        "!threshold 2",
    )]))
    .await;
    assert!(app.summarizer.recorded_invocations().is_empty());

    app.post_webhook(&envelope(vec![message_event("group-1", "Carol", "three")]))
        .await;

    let store = app.store.clone();
    eventually(|| {
        let store = store.clone();
        async move { store.messages("group-1").await.unwrap().is_empty() }
    })
    .await;

    let invocations = app.summarizer.recorded_invocations();
    assert_eq!(invocations.len(), 1);
    assert_eq!(invocations[0].len(), 3);
}
