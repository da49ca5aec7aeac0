//! # Types Module
//!
//! Wire-level data model shared by the chat, deferred, file and video clients.
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`CompletionResponse`] | Full response with one [`CompletionOutput`] per index |
//! | [`CompletionChunk`] | Streaming update carrying [`OutputChunk`] deltas |
//! | [`CompletionRequest`] | Request body built from a conversation |
//! | [`Message`] | Conversation message with role and content |
//! | [`DeferredStatus`] | Status of a polled request |
//! | [`UploadFrame`] | One frame of a streaming file upload |
//!
//! ## Submodules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`completion`] | Responses, outputs, usage, tool calls |
//! | [`chunk`] | Streaming chunks and deltas |
//! | [`message`] | Messages and requests |
//! | [`deferred`] | Deferred status and poll results |
//! | [`file`] | Upload frames and file metadata |

pub mod chunk;
pub mod completion;
pub mod deferred;
pub mod file;
pub mod message;

pub use chunk::{CompletionChunk, Delta, OutputChunk};
pub use completion::{
    CompletionMessage, CompletionOutput, CompletionResponse, FinishReason, FunctionCall, LogProb,
    LogProbs, Role, ToolCall, TopLogProb, Usage,
};
pub use deferred::{DeferredPoll, DeferredStatus};
pub use file::{FileDeleted, FileMetadata, UploadFrame};
pub use message::{
    CompletionRequest, ContentBlock, ImageDetail, ImageUrl, Message, MessageContent,
};
