//! Dispatch lifecycle tests: reply rendering, failure paths, and the
//! crisis alert, against a wiremock companion service.

use crate::helpers::{fast_config, harness, harness_with_config, settle};
use serde_json::json;
use solace::dispatcher::{OFFLINE_NOTICE, OFFLINE_REPLY, SERVER_FAILURE_MESSAGE};
use solace::emotion::Emotion;
use std::sync::atomic::Ordering;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Default synthesis mock: delegate to the local voice so the spawned
/// speak task settles without audio plumbing.
async fn mount_tts_fallback(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/tts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "fallback": true })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn reply_is_revealed_with_emotion_indicator() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({ "message": "I feel low today" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "I hear you.",
            "emotion": "sad",
            "crisis": false
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_tts_fallback(&server).await;

    let h = harness(&server.uri());
    h.dispatcher.send_user_message("I feel low today").await;
    settle().await;

    let bubbles = h.surface.bubbles();
    assert_eq!(bubbles[0], ("user".to_owned(), "I feel low today".to_owned()));

    let slots = h.surface.slots();
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].content(), "I hear you.");

    assert_eq!(*h.surface.emotion.lock().unwrap(), Some(Emotion::Sad));
    assert!(!h.surface.crisis_was_shown.load(Ordering::SeqCst));
    assert_eq!(h.surface.typing(), vec![true, false]);

    let cached = h.dispatcher.cached_interactions();
    assert_eq!(cached.len(), 1);
    assert_eq!(cached[0].user_text, "I feel low today");
    assert_eq!(cached[0].bot_text, "I hear you.");
    assert_eq!(cached[0].emotion, Emotion::Sad);
}

#[tokio::test]
async fn crisis_alert_shows_and_auto_hides() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "Please stay with me.",
            "crisis": true
        })))
        .mount(&server)
        .await;
    mount_tts_fallback(&server).await;

    // 150ms dwell from the fast config.
    let h = harness(&server.uri());
    h.dispatcher.send_user_message("help").await;

    assert!(h.surface.crisis_visible.load(Ordering::SeqCst));

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(!h.surface.crisis_visible.load(Ordering::SeqCst));
    assert!(h.surface.crisis_was_shown.load(Ordering::SeqCst));
}

#[tokio::test]
async fn server_error_appends_generic_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let h = harness(&server.uri());
    h.dispatcher.send_user_message("hello").await;
    settle().await;

    assert_eq!(h.surface.bot_texts(), vec![SERVER_FAILURE_MESSAGE]);
    assert_eq!(h.surface.typing(), vec![true, false]);
    assert!(h.surface.slots().is_empty());
    assert!(h.dispatcher.cached_interactions().is_empty());
    // No spoken reply on the generic failure path.
    assert!(h.synth.spoken().is_empty());
}

#[tokio::test]
async fn transport_failure_speaks_offline_reply_locally() {
    // Nothing listens here; the connection is refused immediately.
    let h = harness("http://127.0.0.1:9");
    h.dispatcher.send_user_message("anyone there?").await;
    settle().await;

    assert_eq!(h.surface.bot_texts(), vec![OFFLINE_NOTICE, OFFLINE_REPLY]);
    assert_eq!(h.surface.typing(), vec![true, false]);
    assert_eq!(h.synth.spoken(), vec![OFFLINE_REPLY.to_owned()]);
    assert!(h.sink.played().is_empty());
}

#[tokio::test]
async fn malformed_reply_takes_the_offline_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_string("this is not json"))
        .mount(&server)
        .await;

    let h = harness(&server.uri());
    h.dispatcher.send_user_message("hello").await;
    settle().await;

    assert_eq!(h.surface.bot_texts(), vec![OFFLINE_NOTICE, OFFLINE_REPLY]);
    assert_eq!(h.surface.typing(), vec![true, false]);
}

#[tokio::test]
async fn missing_reply_fields_fall_back_to_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "Noted." })))
        .mount(&server)
        .await;
    mount_tts_fallback(&server).await;

    let h = harness(&server.uri());
    h.dispatcher.send_user_message("just checking").await;
    settle().await;

    assert_eq!(*h.surface.emotion.lock().unwrap(), Some(Emotion::Neutral));
    assert!(!h.surface.crisis_was_shown.load(Ordering::SeqCst));
    assert_eq!(h.surface.slots()[0].content(), "Noted.");
}

#[tokio::test]
async fn empty_input_is_a_noop() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "hi" })))
        .expect(0)
        .mount(&server)
        .await;

    let h = harness(&server.uri());
    h.dispatcher.send_user_message("   ").await;
    settle().await;

    assert!(h.surface.bubbles().is_empty());
    assert!(h.surface.typing().is_empty());
}

#[tokio::test]
async fn input_is_trimmed_before_sending() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({ "message": "hello" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "hi" })))
        .expect(1)
        .mount(&server)
        .await;
    mount_tts_fallback(&server).await;

    let h = harness(&server.uri());
    h.dispatcher.send_user_message("  hello  ").await;
    settle().await;

    assert_eq!(h.surface.bubbles()[0].1, "hello");
}

#[tokio::test]
async fn disabled_voice_still_reveals_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "Quiet reply." })))
        .mount(&server)
        .await;
    // No synthesis mock mounted: a disabled voice must never call it.
    Mock::given(method("POST"))
        .and(path("/api/tts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "fallback": true })))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = fast_config(&server.uri());
    config.voice.enabled = false;
    let h = harness_with_config(config);

    h.dispatcher.send_user_message("shh").await;
    settle().await;

    assert_eq!(h.surface.slots()[0].content(), "Quiet reply.");
    assert!(h.synth.calls().is_empty());
}
