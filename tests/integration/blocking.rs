//! The blocking facade drives the same accumulator and poll loop as the async API.

use crate::common::{completion, MemoryFiles, ScriptedChat};
use std::sync::Arc;
use std::time::Duration;
use xai_sdk::files::UploadOptions;
use xai_sdk::types::{CompletionChunk, FinishReason, OutputChunk};
use xai_sdk::{blocking, ClientBuilder, ClientConfig, DeferredPoll, Message, UploadSource};

fn client(chat: Arc<ScriptedChat>) -> blocking::Client {
    let inner = ClientBuilder::with_config(ClientConfig::default())
        .chat_transport(chat)
        .file_transport(Arc::new(MemoryFiles::default()))
        .build()
        .unwrap();
    blocking::Client::new(inner).unwrap()
}

#[test]
fn test_blocking_stream_iterates_chunks() {
    let transport = ScriptedChat::with_chunks(vec![
        Ok(CompletionChunk::new("s", vec![OutputChunk::text(0, "Hel")])),
        Ok(CompletionChunk::new("s", vec![OutputChunk::text(0, "lo")])),
        Ok(CompletionChunk::new(
            "s",
            vec![OutputChunk::text(0, "!").with_finish_reason(FinishReason::Stop)],
        )),
    ]);
    let client = client(transport);
    let mut chat = client.chat().unwrap().create("grok-4");
    chat.append(Message::user("greet me"));

    let mut stream = chat.stream().unwrap();
    let pieces: Vec<String> = stream
        .by_ref()
        .map(|c| c.unwrap().content().into_owned())
        .collect();
    assert_eq!(pieces, vec!["Hel", "lo", "!"]);
    assert_eq!(stream.response().content(), "Hello!");
    assert!(stream.response().is_finished());
}

#[test]
fn test_blocking_batch_stream_hands_out_one_response_per_choice() {
    let transport = ScriptedChat::with_chunks(vec![
        Ok(CompletionChunk::new(
            "s",
            vec![OutputChunk::text(0, "left"), OutputChunk::text(1, "right")],
        )),
        Ok(CompletionChunk::new(
            "s",
            vec![
                OutputChunk::text(0, "").with_finish_reason(FinishReason::Stop),
                OutputChunk::text(1, "!").with_finish_reason(FinishReason::Stop),
            ],
        )),
    ]);
    let client = client(transport);
    let mut chat = client.chat().unwrap().create("grok-4");
    chat.append(Message::user("two takes"));

    let mut stream = chat.stream_batch(2).unwrap();
    let (responses, views) = stream.next().unwrap().unwrap();
    assert_eq!(responses[0].content(), "left");
    assert_eq!(responses[1].content(), "right");
    assert_eq!(views[1].content(), "right");

    let mut responses = stream.collect_final().unwrap();
    assert_eq!(responses[0].content(), "left");
    assert_eq!(responses[1].content(), "right!");
}

#[test]
fn test_blocking_sample_and_defer() {
    let transport = ScriptedChat::with_polls(vec![
        DeferredPoll::pending(),
        DeferredPoll::done(completion(&["later"])),
    ]);
    let client = client(transport.clone());
    let mut chat = client
        .chat()
        .unwrap()
        .create("grok-4")
        .configure(|c| c.max_tokens(32).seed(7));
    chat.append(Message::user("hi"));

    let mut now = chat.sample().unwrap();
    assert_eq!(now.content(), "choice 0");

    let mut later = chat
        .defer(Some(Duration::from_secs(5)), Some(Duration::from_millis(1)))
        .unwrap();
    assert_eq!(later.content(), "later");

    let requests = transport.requests.lock().unwrap();
    assert_eq!(requests[0].max_tokens, Some(32));
    assert_eq!(requests[1].seed, Some(7));
}

#[test]
fn test_blocking_upload() {
    let client = client(Arc::new(ScriptedChat::default()));
    let files = client.files().unwrap();
    let meta = files
        .upload(
            UploadSource::blocking_reader(std::io::Cursor::new(vec![1u8; 100]), Some("ones.bin".to_string())),
            UploadOptions::new(),
        )
        .unwrap();
    assert_eq!(meta.filename, "ones.bin");
    assert_eq!(meta.size, 100);

    assert_eq!(files.get(&meta.id).unwrap().filename, "ones.bin");
    assert_eq!(files.content(&meta.id).unwrap().to_vec(), vec![1u8; 100]);
    assert!(files.delete(&meta.id).unwrap().deleted);
}
