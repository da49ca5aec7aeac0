//! # Transport Module
//!
//! Seams between the SDK core and the network.
//!
//! The chat and file services are reached through the [`ChatTransport`] and
//! [`FileTransport`] traits; the SDK never encodes the RPC envelope itself. Video
//! generation talks plain REST through [`HttpTransport`].

pub mod http;

pub use http::HttpTransport;

use crate::types::{
    CompletionChunk, CompletionRequest, CompletionResponse, DeferredPoll, FileDeleted,
    FileMetadata, UploadFrame,
};
use crate::{BoxStream, Result};
use async_trait::async_trait;
use bytes::Bytes;

/// Completion service.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// One-shot completion with all `request.n` outputs.
    async fn get_completion(&self, request: &CompletionRequest) -> Result<CompletionResponse>;

    /// Server-streamed completion. The stream ends when the server closes it.
    async fn stream_completion(
        &self,
        request: &CompletionRequest,
    ) -> Result<BoxStream<'static, CompletionChunk>>;

    /// Start a deferred completion and return its request id.
    async fn start_deferred(&self, request: &CompletionRequest) -> Result<String>;

    /// Query a deferred completion. Read-only; never restarts the job.
    async fn get_deferred(&self, request_id: &str) -> Result<DeferredPoll<CompletionResponse>>;
}

/// File storage service.
#[async_trait]
pub trait FileTransport: Send + Sync {
    /// Client-streamed upload: one init frame followed by data frames.
    async fn upload_file(&self, frames: BoxStream<'static, UploadFrame>) -> Result<FileMetadata>;

    async fn get_file(&self, file_id: &str) -> Result<FileMetadata>;

    async fn delete_file(&self, file_id: &str) -> Result<FileDeleted>;

    /// Server-streamed file body, in order.
    async fn file_content(&self, file_id: &str) -> Result<BoxStream<'static, Bytes>>;
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Transport error: {0}")]
    Other(String),
}
