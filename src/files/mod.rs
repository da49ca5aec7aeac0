//! # Files Module
//!
//! Streaming uploads to the file service, plus metadata lookup, deletion and download
//! of stored files.
//!
//! Every upload is a client-streamed sequence of one init frame followed by data frames of
//! at most the configured frame size (3 MiB by default). [`FilesClient::batch_upload`]
//! runs many uploads with bounded concurrency and records each outcome in a
//! [`BatchLedger`] instead of failing the whole batch.

pub mod chunking;
pub mod progress;

pub use chunking::{upload_frames, UploadSource, DEFAULT_FRAME_SIZE};
pub use progress::{Progress, ProgressUpdate};

use crate::batch::{BatchExecutor, BatchExecutorConfig, BatchLedger, DEFAULT_MAX_CONCURRENCY};
use crate::transport::FileTransport;
use crate::types::{FileDeleted, FileMetadata};
use crate::{Error, ErrorContext, Result};
use bytes::{Bytes, BytesMut};
use futures::TryStreamExt;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, info_span, Instrument};

/// Options for a single upload.
#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
    /// Overrides the name derived from the source.
    pub filename: Option<String>,
    pub on_progress: Option<Progress>,
}

impl UploadOptions {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn filename(mut self, name: impl Into<String>) -> Self {
        self.filename = Some(name.into());
        self
    }
    pub fn on_progress(mut self, progress: Progress) -> Self {
        self.on_progress = Some(progress);
        self
    }
}

/// One entry of a batch upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchFile {
    Path(PathBuf),
    Bytes { name: String, data: Bytes },
}

impl BatchFile {
    fn to_source(&self) -> (UploadSource, Option<String>) {
        match self {
            BatchFile::Path(p) => (UploadSource::Path(p.clone()), None),
            BatchFile::Bytes { name, data } => (UploadSource::Bytes(data.clone()), Some(name.clone())),
        }
    }
}

impl From<PathBuf> for BatchFile {
    fn from(p: PathBuf) -> Self {
        BatchFile::Path(p)
    }
}

impl From<&std::path::Path> for BatchFile {
    fn from(p: &std::path::Path) -> Self {
        BatchFile::Path(p.to_path_buf())
    }
}

impl From<&str> for BatchFile {
    fn from(p: &str) -> Self {
        BatchFile::Path(PathBuf::from(p))
    }
}

pub type FileCompleteCallback = Arc<dyn Fn(usize, &BatchFile, &Result<FileMetadata>) + Send + Sync>;

#[derive(Clone, Default)]
pub struct BatchUploadOptions {
    /// Uploads in flight at once; defaults to the client's batch size.
    pub batch_size: Option<usize>,
    /// Called exactly once per file, in completion order.
    pub on_file_complete: Option<FileCompleteCallback>,
}

impl BatchUploadOptions {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn batch_size(mut self, n: usize) -> Self {
        self.batch_size = Some(n);
        self
    }
    pub fn on_file_complete(
        mut self,
        f: impl Fn(usize, &BatchFile, &Result<FileMetadata>) + Send + Sync + 'static,
    ) -> Self {
        self.on_file_complete = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for BatchUploadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchUploadOptions")
            .field("batch_size", &self.batch_size)
            .field("on_file_complete", &self.on_file_complete.is_some())
            .finish()
    }
}

#[derive(Clone)]
pub struct FilesClient {
    transport: Arc<dyn FileTransport>,
    frame_size: usize,
    batch_size: usize,
}

impl FilesClient {
    pub fn new(transport: Arc<dyn FileTransport>) -> Self {
        Self {
            transport,
            frame_size: DEFAULT_FRAME_SIZE,
            batch_size: DEFAULT_MAX_CONCURRENCY,
        }
    }

    pub fn with_frame_size(mut self, frame_size: usize) -> Self {
        self.frame_size = frame_size;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Upload one source and return the stored file's metadata.
    pub async fn upload(&self, source: UploadSource, options: UploadOptions) -> Result<FileMetadata> {
        let span = info_span!("files.upload", source = ?source);
        async {
            let frames =
                upload_frames(source, options.filename, self.frame_size, options.on_progress).await?;
            let meta = self.transport.upload_file(frames).await?;
            info!(file_id = %meta.id, filename = %meta.filename, size = meta.size, "file uploaded");
            Ok(meta)
        }
        .instrument(span)
        .await
    }

    /// Upload many files with bounded concurrency.
    ///
    /// Fails only for an empty input; per-file failures are recorded in the ledger.
    pub async fn batch_upload<I, F>(&self, files: I, options: BatchUploadOptions) -> Result<BatchLedger<FileMetadata>>
    where
        I: IntoIterator<Item = F>,
        F: Into<BatchFile>,
    {
        let files: Vec<BatchFile> = files.into_iter().map(Into::into).collect();
        if files.is_empty() {
            return Err(Error::validation_with_context(
                "no files to upload",
                ErrorContext::new().with_field_path("files").with_source("files"),
            ));
        }
        let batch_size = options.batch_size.unwrap_or(self.batch_size).max(1);
        let span = info_span!("files.batch_upload", files = files.len(), batch_size);

        let executor =
            BatchExecutor::with_config(BatchExecutorConfig::new().with_max_concurrency(batch_size));
        let ledger = executor
            .execute_concurrent(
                files,
                |_, file| {
                    let (source, filename) = file.to_source();
                    self.upload(source, UploadOptions { filename, on_progress: None })
                },
                options.on_file_complete.as_deref(),
            )
            .instrument(span)
            .await;
        Ok(ledger)
    }

    /// Metadata of a stored file.
    pub async fn get(&self, file_id: &str) -> Result<FileMetadata> {
        check_file_id(file_id)?;
        let span = info_span!("files.get", file_id);
        let meta = self.transport.get_file(file_id).instrument(span).await?;
        debug!(file_id, filename = %meta.filename, size = meta.size, "file metadata retrieved");
        Ok(meta)
    }

    pub async fn delete(&self, file_id: &str) -> Result<FileDeleted> {
        check_file_id(file_id)?;
        let span = info_span!("files.delete", file_id);
        let result = self.transport.delete_file(file_id).instrument(span).await?;
        info!(file_id, deleted = result.deleted, "file delete requested");
        Ok(result)
    }

    /// Download a file's full body; the server stream is joined in order.
    pub async fn content(&self, file_id: &str) -> Result<Bytes> {
        check_file_id(file_id)?;
        let span = info_span!("files.content", file_id);
        async {
            let chunks = self.transport.file_content(file_id).await?;
            let body = chunks
                .try_fold(BytesMut::new(), |mut acc, chunk| async move {
                    acc.extend_from_slice(&chunk);
                    Ok(acc)
                })
                .await?
                .freeze();
            debug!(file_id, bytes = body.len(), "file content downloaded");
            Ok(body)
        }
        .instrument(span)
        .await
    }
}

fn check_file_id(file_id: &str) -> Result<()> {
    if file_id.is_empty() {
        return Err(Error::validation_with_context(
            "file id is empty",
            ErrorContext::new().with_field_path("file_id").with_source("files"),
        ));
    }
    Ok(())
}
