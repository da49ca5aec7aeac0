//! Shared fixtures: scripted transports and logging setup.

use async_trait::async_trait;
use bytes::Bytes;
use futures::TryStreamExt;
use std::sync::{Arc, Mutex, Once};
use xai_sdk::transport::{ChatTransport, FileTransport};
use xai_sdk::types::{
    CompletionChunk, CompletionMessage, CompletionOutput, CompletionRequest, CompletionResponse,
    DeferredPoll, FileDeleted, FileMetadata, FinishReason, Role, UploadFrame,
};
use xai_sdk::{BoxStream, Error, Result};

static INIT: Once = Once::new();

/// Route `tracing` output through `RUST_LOG` once per test binary.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn completion(texts: &[&str]) -> CompletionResponse {
    CompletionResponse {
        id: "resp-1".to_string(),
        model: "grok-4".to_string(),
        outputs: texts
            .iter()
            .enumerate()
            .map(|(i, t)| CompletionOutput {
                index: i as u32,
                finish_reason: FinishReason::Stop,
                message: CompletionMessage {
                    role: Role::Assistant,
                    content: t.to_string(),
                    ..Default::default()
                },
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

/// Chat transport replaying a fixed chunk script and a fixed poll script.
#[derive(Default)]
pub struct ScriptedChat {
    pub chunks: Mutex<Vec<Result<CompletionChunk>>>,
    pub polls: Mutex<Vec<DeferredPoll<CompletionResponse>>>,
    pub requests: Mutex<Vec<CompletionRequest>>,
    pub poll_calls: Mutex<u32>,
}

impl ScriptedChat {
    pub fn with_chunks(chunks: Vec<Result<CompletionChunk>>) -> Arc<Self> {
        let t = Self::default();
        *t.chunks.lock().unwrap() = chunks;
        Arc::new(t)
    }

    pub fn with_polls(polls: Vec<DeferredPoll<CompletionResponse>>) -> Arc<Self> {
        let t = Self::default();
        *t.polls.lock().unwrap() = polls;
        Arc::new(t)
    }
}

#[async_trait]
impl ChatTransport for ScriptedChat {
    async fn get_completion(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let texts: Vec<String> = (0..request.n).map(|i| format!("choice {}", i)).collect();
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        Ok(completion(&refs))
    }

    async fn stream_completion(
        &self,
        request: &CompletionRequest,
    ) -> Result<BoxStream<'static, CompletionChunk>> {
        self.requests.lock().unwrap().push(request.clone());
        let chunks = std::mem::take(&mut *self.chunks.lock().unwrap());
        Ok(Box::pin(futures::stream::iter(chunks)))
    }

    async fn start_deferred(&self, request: &CompletionRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        Ok("req-42".to_string())
    }

    async fn get_deferred(&self, _request_id: &str) -> Result<DeferredPoll<CompletionResponse>> {
        *self.poll_calls.lock().unwrap() += 1;
        let mut polls = self.polls.lock().unwrap();
        if polls.is_empty() {
            Ok(DeferredPoll::pending())
        } else {
            Ok(polls.remove(0))
        }
    }
}

/// File transport that drains the frame stream and records what it saw.
///
/// Names starting with `reject` fail with a remote error. Stored files are `file-<n>`,
/// numbered from 1 in upload order, and are served back in 1 KiB chunks.
#[derive(Default)]
pub struct MemoryFiles {
    pub uploads: Mutex<Vec<(String, Vec<u8>, usize)>>,
    pub deleted: Mutex<Vec<String>>,
}

impl MemoryFiles {
    fn stored(&self, file_id: &str) -> Result<(String, Vec<u8>)> {
        let missing = || Error::Remote {
            status: 404,
            message: format!("{} not found", file_id),
        };
        if self.deleted.lock().unwrap().iter().any(|id| id == file_id) {
            return Err(missing());
        }
        let n: usize = file_id
            .strip_prefix("file-")
            .and_then(|n| n.parse().ok())
            .ok_or_else(missing)?;
        let uploads = self.uploads.lock().unwrap();
        let (name, body, _) = uploads.get(n.wrapping_sub(1)).ok_or_else(missing)?;
        Ok((name.clone(), body.clone()))
    }
}

#[async_trait]
impl FileTransport for MemoryFiles {
    async fn upload_file(&self, frames: BoxStream<'static, UploadFrame>) -> Result<FileMetadata> {
        let frames: Vec<UploadFrame> = frames.try_collect().await?;
        let name = match frames.first() {
            Some(UploadFrame::Init { name, .. }) => name.clone(),
            _ => {
                return Err(Error::Remote {
                    status: 400,
                    message: "first frame must be init".to_string(),
                })
            }
        };
        if name.starts_with("reject") {
            return Err(Error::Remote {
                status: 413,
                message: format!("{} refused", name),
            });
        }
        let data_frames = frames.len() - 1;
        let body: Vec<u8> = frames
            .iter()
            .filter_map(UploadFrame::data)
            .flat_map(|b| b.iter().copied())
            .collect();
        let size = body.len() as u64;
        let mut uploads = self.uploads.lock().unwrap();
        uploads.push((name.clone(), body, data_frames));
        Ok(FileMetadata {
            id: format!("file-{}", uploads.len()),
            filename: name,
            size,
            ..Default::default()
        })
    }

    async fn get_file(&self, file_id: &str) -> Result<FileMetadata> {
        let (name, body) = self.stored(file_id)?;
        Ok(FileMetadata {
            id: file_id.to_string(),
            filename: name,
            size: body.len() as u64,
            ..Default::default()
        })
    }

    async fn delete_file(&self, file_id: &str) -> Result<FileDeleted> {
        self.stored(file_id)?;
        self.deleted.lock().unwrap().push(file_id.to_string());
        Ok(FileDeleted {
            id: file_id.to_string(),
            deleted: true,
        })
    }

    async fn file_content(&self, file_id: &str) -> Result<BoxStream<'static, Bytes>> {
        let (_, body) = self.stored(file_id)?;
        let chunks: Vec<Result<Bytes>> = body
            .chunks(1024)
            .map(|c| Ok(Bytes::copy_from_slice(c)))
            .collect();
        Ok(Box::pin(futures::stream::iter(chunks)))
    }
}
