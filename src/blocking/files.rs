use crate::batch::BatchLedger;
use crate::files::{self as async_files, BatchFile, BatchUploadOptions, UploadOptions, UploadSource};
use crate::types::{FileDeleted, FileMetadata};
use bytes::Bytes;
use crate::Result;
use std::sync::Arc;
use tokio::runtime::Runtime;

#[derive(Clone)]
pub struct FilesClient {
    inner: async_files::FilesClient,
    rt: Arc<Runtime>,
}

impl FilesClient {
    pub(crate) fn new(inner: async_files::FilesClient, rt: Arc<Runtime>) -> Self {
        Self { inner, rt }
    }

    pub fn upload(&self, source: UploadSource, options: UploadOptions) -> Result<FileMetadata> {
        self.rt.block_on(self.inner.upload(source, options))
    }

    pub fn batch_upload<I, F>(&self, files: I, options: BatchUploadOptions) -> Result<BatchLedger<FileMetadata>>
    where
        I: IntoIterator<Item = F>,
        F: Into<BatchFile>,
    {
        self.rt.block_on(self.inner.batch_upload(files, options))
    }

    pub fn get(&self, file_id: &str) -> Result<FileMetadata> {
        self.rt.block_on(self.inner.get(file_id))
    }

    pub fn delete(&self, file_id: &str) -> Result<FileDeleted> {
        self.rt.block_on(self.inner.delete(file_id))
    }

    pub fn content(&self, file_id: &str) -> Result<Bytes> {
        self.rt.block_on(self.inner.content(file_id))
    }
}
