//! # xai-sdk-rust
//!
//! Rust SDK core for the xAI API.
//!
//! ## Overview
//!
//! The crate sits between application code and a transport. It owns the parts of an SDK
//! that are independent of the wire: folding streamed completion chunks into a single
//! response, polling deferred requests to completion, and splitting files into upload
//! frames with bounded-concurrency batch uploads.
//!
//! - **Streaming accumulation**: [`Response`] absorbs [`Chunk`]s and defers text
//!   concatenation until the text is read
//! - **Deferred polling**: [`PollTimer`] and [`deferred::poll_until_done`] drive any
//!   "start, then poll" API with a deadline
//! - **Chunked uploads**: [`files::upload_frames`] turns a path, bytes or reader into a lazy
//!   stream of frames; [`files::FilesClient::batch_upload`] fans out with a concurrency cap
//! - **Blocking facade**: [`blocking`] wraps every call on an owned runtime
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use xai_sdk::{ClientBuilder, Message};
//! # fn transport() -> std::sync::Arc<dyn xai_sdk::transport::ChatTransport> { unimplemented!() }
//!
//! #[tokio::main]
//! async fn main() -> xai_sdk::Result<()> {
//!     let client = ClientBuilder::new().chat_transport(transport()).build()?;
//!
//!     let mut chat = client.chat()?.create("grok-4");
//!     chat.append(Message::user("Hello, how are you?"));
//!
//!     let mut stream = chat.stream().await?;
//!     while let Some(step) = stream.next().await {
//!         let (response, chunk) = step?;
//!         print!("{}", chunk);
//!         if response.is_finished() {
//!             break;
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`chat`] | Chat sessions, response accumulator and streams |
//! | [`deferred`] | Poll timer and deferred state machine |
//! | [`files`] | Upload framing, progress reporting and the files client |
//! | [`batch`] | Bounded-concurrency execution and the per-item ledger |
//! | [`video`] | Video generation over REST |
//! | [`client`] | Top-level client and builder |
//! | [`blocking`] | Thread-blocking facade |
//! | [`transport`] | Transport traits and the HTTP implementation |
//! | [`types`] | Wire data types |
//! | [`config`] | Client configuration and environment loading |

pub mod batch;
pub mod blocking;
pub mod chat;
pub mod client;
pub mod config;
pub mod deferred;
pub mod files;
pub mod transport;
pub mod types;
pub mod video;

// Re-export main types for convenience
pub use batch::{BatchExecutor, BatchLedger};
pub use chat::{BatchResponseStream, Chat, ChatClient, Chunk, Response, ResponseStream};
pub use client::{Client, ClientBuilder};
pub use config::ClientConfig;
pub use deferred::PollTimer;
pub use files::{FilesClient, Progress, UploadSource};
pub use types::{
    completion::{FinishReason, Role},
    deferred::{DeferredPoll, DeferredStatus},
    message::Message,
};
pub use video::{VideoClient, VideoRequest};

use futures::Stream;
use std::pin::Pin;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// A unified pinned, boxed stream that emits `Result<T>`
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = Result<T>> + Send + 'a>>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
