//! Deferred completions end to end.

use crate::common::{completion, init_tracing, ScriptedChat};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};
use xai_sdk::deferred::{self, PollTimer};
use xai_sdk::{ChatClient, DeferredPoll, Error, Message};

const FAST: Option<Duration> = Some(Duration::from_millis(2));

fn chat_over(transport: std::sync::Arc<ScriptedChat>) -> xai_sdk::Chat {
    let mut chat = ChatClient::new(transport).create("grok-4");
    chat.append(Message::user("write an essay"));
    chat
}

#[tokio::test]
async fn test_defer_returns_after_done() {
    init_tracing();
    let transport = ScriptedChat::with_polls(vec![
        DeferredPoll::pending(),
        DeferredPoll::pending(),
        DeferredPoll::done(completion(&["essay"])),
    ]);
    let chat = chat_over(transport.clone());

    let mut response = chat.defer(Some(Duration::from_secs(5)), FAST).await.unwrap();
    assert_eq!(response.content(), "essay");
    assert_eq!(*transport.poll_calls.lock().unwrap(), 3);
}

#[tokio::test]
async fn test_defer_batch_splits_choices() {
    let transport = ScriptedChat::with_polls(vec![DeferredPoll::done(completion(&["a", "b", "c"]))]);
    let chat = chat_over(transport.clone());

    let mut responses = chat.defer_batch(3, Some(Duration::from_secs(5)), FAST).await.unwrap();
    assert_eq!(responses.len(), 3);
    assert_eq!(responses[2].content(), "c");
    assert_eq!(transport.requests.lock().unwrap()[0].n, 3);
}

#[tokio::test]
async fn test_defer_batch_with_missing_choice_fails() {
    let transport = ScriptedChat::with_polls(vec![DeferredPoll::done(completion(&["a", "b"]))]);
    let chat = chat_over(transport);

    let err = chat
        .defer_batch(3, Some(Duration::from_secs(5)), FAST)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidResponse { .. }));
}

#[tokio::test]
async fn test_expired_stops_polling() {
    let transport = ScriptedChat::with_polls(vec![
        DeferredPoll::pending(),
        DeferredPoll::expired(),
        DeferredPoll::done(completion(&["too late"])),
    ]);
    let chat = chat_over(transport.clone());

    let err = chat.defer(Some(Duration::from_secs(5)), FAST).await.unwrap_err();
    assert!(err.is_expired());
    assert!(matches!(err, Error::Expired { ref request_id, .. } if request_id == "req-42"));
    assert_eq!(*transport.poll_calls.lock().unwrap(), 2);
}

#[tokio::test]
async fn test_unknown_status_is_an_error() {
    let transport = ScriptedChat::with_polls(vec![DeferredPoll::unknown("PAUSED")]);
    let chat = chat_over(transport);

    let err = chat.defer(Some(Duration::from_secs(5)), FAST).await.unwrap_err();
    assert!(matches!(err, Error::UnknownStatus { ref status } if status == "PAUSED"));
}

#[tokio::test]
async fn test_never_finishing_request_times_out() {
    let transport = ScriptedChat::with_polls(vec![]);
    let chat = chat_over(transport.clone());

    let started = Instant::now();
    let err = chat
        .defer(Some(Duration::from_millis(40)), Some(Duration::from_millis(10)))
        .await
        .unwrap_err();
    assert!(err.is_timeout());
    assert!(started.elapsed() >= Duration::from_millis(40));
    assert!(*transport.poll_calls.lock().unwrap() >= 2);
}

#[tokio::test]
async fn test_poll_loop_accepts_any_fetcher() {
    let calls = AtomicU32::new(0);
    let timer = PollTimer::new(Some(Duration::from_secs(1)), Some(Duration::from_millis(1)));
    let value = deferred::poll_until_done("job-7", timer, || {
        let n = calls.fetch_add(1, Ordering::SeqCst);
        async move {
            Ok(if n < 4 {
                DeferredPoll::pending()
            } else {
                DeferredPoll::done(n * 10)
            })
        }
    })
    .await
    .unwrap();
    assert_eq!(value, 40);
    assert_eq!(calls.load(Ordering::SeqCst), 5);
}
