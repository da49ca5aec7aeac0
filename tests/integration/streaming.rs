//! Streaming accumulation through the public chat API.

use crate::common::{init_tracing, ScriptedChat};
use xai_sdk::types::{CompletionChunk, FinishReason, OutputChunk, Role, Usage};
use xai_sdk::{ChatClient, Error, Message};

fn chat_over(transport: std::sync::Arc<ScriptedChat>) -> xai_sdk::Chat {
    let mut chat = ChatClient::new(transport).create("grok-4");
    chat.append(Message::system("be brief"));
    chat.append(Message::user("count to three"));
    chat
}

#[tokio::test]
async fn test_stream_accumulates_every_field() {
    init_tracing();
    let transport = ScriptedChat::with_chunks(vec![
        Ok(CompletionChunk::new(
            "c-1",
            vec![OutputChunk::text(0, "").with_role(Role::Assistant).with_reasoning("thinking")],
        )
        .with_model("grok-4-0709")),
        Ok(CompletionChunk::new("c-1", vec![OutputChunk::text(0, "one, ")])),
        Ok(CompletionChunk::new("c-1", vec![OutputChunk::text(0, "two, ")])),
        Ok(CompletionChunk::new(
            "c-1",
            vec![OutputChunk::text(0, "three")
                .with_finish_reason(FinishReason::Stop)
                .with_citations(vec!["https://x.ai".to_string()])],
        )
        .with_usage(Usage {
            prompt_tokens: 9,
            completion_tokens: 4,
            total_tokens: 13,
            ..Default::default()
        })),
    ]);
    let mut chat = chat_over(transport.clone());

    let mut stream = chat.stream().await.unwrap();
    let mut seen = String::new();
    while let Some(step) = stream.next().await {
        let (response, chunk) = step.unwrap();
        seen.push_str(&chunk.content());
        assert_eq!(response.content(), seen.as_str());
    }

    let mut response = stream.into_response();
    assert_eq!(response.id(), "c-1");
    assert_eq!(response.model(), "grok-4-0709");
    assert_eq!(response.role(), Role::Assistant);
    assert_eq!(response.content(), "one, two, three");
    assert_eq!(response.reasoning_content(), "thinking");
    assert_eq!(response.finish_reason().unwrap(), FinishReason::Stop);
    assert_eq!(response.citations(), vec!["https://x.ai"]);
    assert_eq!(response.usage().total_tokens, 13);
    assert!(response.is_finished());

    chat.append_response(&mut response);
    assert_eq!(chat.messages().len(), 3);
    assert_eq!(chat.messages()[2].text(), "one, two, three");
    assert_eq!(transport.requests.lock().unwrap()[0].messages.len(), 2);
}

#[tokio::test]
async fn test_text_is_joined_only_when_read() {
    let chunks = (0..50)
        .map(|i| Ok(CompletionChunk::new("c", vec![OutputChunk::text(0, format!("{} ", i))])))
        .collect();
    let chat = chat_over(ScriptedChat::with_chunks(chunks));

    let mut stream = chat.stream().await.unwrap();
    while let Some(step) = stream.next().await {
        step.unwrap();
    }
    let mut response = stream.into_response();
    assert_eq!(response.pending_fragments(), 50);

    let text = response.content().into_owned();
    assert!(text.starts_with("0 1 2 "));
    assert!(text.ends_with("48 49 "));
    assert_eq!(response.pending_fragments(), 0);
    assert_eq!(response.content(), text.as_str());
}

#[tokio::test]
async fn test_transport_error_keeps_partial_response() {
    let chat = chat_over(ScriptedChat::with_chunks(vec![
        Ok(CompletionChunk::new("c", vec![OutputChunk::text(0, "partial")])),
        Err(Error::Remote {
            status: 503,
            message: "unavailable".to_string(),
        }),
    ]));

    let mut stream = chat.stream().await.unwrap();
    assert!(stream.next().await.unwrap().is_ok());
    let err = stream.next().await.unwrap().unwrap_err();
    assert!(matches!(err, Error::Remote { status: 503, .. }));
    assert_eq!(stream.response().content(), "partial");
    assert!(!stream.response().is_finished());
}

#[tokio::test]
async fn test_batch_stream_keeps_outputs_apart() {
    init_tracing();
    let chat = chat_over(ScriptedChat::with_chunks(vec![
        Ok(CompletionChunk::new(
            "b",
            vec![
                OutputChunk::text(1, "x").with_role(Role::Assistant),
                OutputChunk::text(0, "a").with_role(Role::Assistant),
            ],
        )),
        Ok(CompletionChunk::new("b", vec![OutputChunk::text(0, "b")])),
        Ok(CompletionChunk::new(
            "b",
            vec![
                OutputChunk::text(1, "y").with_finish_reason(FinishReason::Stop),
                OutputChunk::text(0, "").with_finish_reason(FinishReason::MaxLen),
            ],
        )),
    ]));

    let mut stream = chat.stream_batch(2).await.unwrap();
    assert_eq!(stream.n(), 2);

    let (responses, views) = stream.next().await.unwrap().unwrap();
    assert_eq!(responses.len(), 2);
    assert_eq!(views.len(), 2);
    assert_eq!(views[0].content(), "a");
    assert_eq!(views[1].content(), "x");
    assert_eq!(responses[0].content(), "a");
    assert_eq!(responses[1].content(), "x");

    let (responses, views) = stream.next().await.unwrap().unwrap();
    assert_eq!(views[0].content(), "b");
    assert!(views[1].is_empty());
    assert_eq!(responses[0].content(), "ab");
    assert_eq!(responses[1].content(), "x");

    let mut responses = stream.collect_final().await.unwrap();
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0].index(), Some(0));
    assert_eq!(responses[0].content(), "ab");
    assert_eq!(responses[1].content(), "xy");
    assert_eq!(responses[0].finish_reason().unwrap(), FinishReason::MaxLen);
    assert_eq!(responses[1].finish_reason().unwrap(), FinishReason::Stop);
    assert!(responses.iter().all(|r| r.is_finished()));
}

#[tokio::test]
async fn test_batch_of_zero_is_rejected() {
    let chat = chat_over(ScriptedChat::with_chunks(vec![]));
    assert!(matches!(chat.stream_batch(0).await, Err(e) if e.is_validation()));
}
