//! Splitting an upload source into init + data frames.

use super::progress::Progress;
use crate::types::UploadFrame;
use crate::{BoxStream, Error, ErrorContext, Result};
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use std::fmt;
use std::io::Read;
use std::path::PathBuf;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio_util::compat::FuturesAsyncReadCompatExt;
use tracing::debug;

/// Largest data frame sent to the file service.
pub const DEFAULT_FRAME_SIZE: usize = 3 * 1024 * 1024;

/// Where upload bytes come from.
pub enum UploadSource {
    Path(PathBuf),
    Bytes(Bytes),
    Reader {
        reader: Box<dyn AsyncRead + Send + Unpin>,
        name: Option<String>,
        size: Option<u64>,
    },
}

impl UploadSource {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        UploadSource::Path(path.into())
    }

    pub fn bytes(data: impl Into<Bytes>) -> Self {
        UploadSource::Bytes(data.into())
    }

    pub fn reader(reader: impl AsyncRead + Send + Unpin + 'static, name: Option<String>) -> Self {
        UploadSource::Reader {
            reader: Box::new(reader),
            name,
            size: None,
        }
    }

    /// Wrap a synchronous reader. Reads block the polling thread, so prefer
    /// [`UploadSource::reader`] for anything slower than memory or local disk.
    pub fn blocking_reader(reader: impl Read + Send + Unpin + 'static, name: Option<String>) -> Self {
        Self::reader(futures::io::AllowStdIo::new(reader).compat(), name)
    }

    /// Known total size, reported to [`Progress::ByTotal`] callbacks.
    pub fn with_size(mut self, total: u64) -> Self {
        if let UploadSource::Reader { size, .. } = &mut self {
            *size = Some(total);
        }
        self
    }

    fn default_name(&self) -> Option<String> {
        match self {
            UploadSource::Path(p) => p.file_name().map(|n| n.to_string_lossy().into_owned()),
            UploadSource::Bytes(_) => None,
            UploadSource::Reader { name, .. } => name.clone(),
        }
    }
}

impl fmt::Debug for UploadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadSource::Path(p) => f.debug_tuple("Path").field(p).finish(),
            UploadSource::Bytes(b) => write!(f, "Bytes({} bytes)", b.len()),
            UploadSource::Reader { name, size, .. } => f
                .debug_struct("Reader")
                .field("name", name)
                .field("size", size)
                .finish_non_exhaustive(),
        }
    }
}

enum FrameInput {
    Memory { data: Bytes, offset: usize },
    Reader(Box<dyn AsyncRead + Send + Unpin>),
}

struct FrameReader {
    input: FrameInput,
    frame_size: usize,
    uploaded: u64,
    total: Option<u64>,
    progress: Option<Progress>,
    done: bool,
}

impl FrameReader {
    async fn read_frame(&mut self) -> std::io::Result<Option<Bytes>> {
        match &mut self.input {
            FrameInput::Memory { data, offset } => {
                if *offset >= data.len() {
                    return Ok(None);
                }
                let end = (*offset + self.frame_size).min(data.len());
                let frame = data.slice(*offset..end);
                *offset = end;
                Ok(Some(frame))
            }
            FrameInput::Reader(reader) => {
                let mut buffer = vec![0u8; self.frame_size];
                let mut total_read = 0;
                while total_read < self.frame_size {
                    match reader.read(&mut buffer[total_read..]).await {
                        Ok(0) => break,
                        Ok(n) => total_read += n,
                        Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                        Err(e) => return Err(e),
                    }
                }
                if total_read == 0 {
                    return Ok(None);
                }
                buffer.truncate(total_read);
                Ok(Some(Bytes::from(buffer)))
            }
        }
    }

    async fn next_frame(mut self) -> Option<(Result<UploadFrame>, Self)> {
        if self.done {
            return None;
        }
        match self.read_frame().await {
            Ok(Some(frame)) => {
                let len = frame.len() as u64;
                self.uploaded += len;
                if let Some(progress) = &self.progress {
                    progress.report(self.uploaded, self.total, len);
                }
                Some((Ok(UploadFrame::Data(frame)), self))
            }
            Ok(None) => None,
            Err(e) => {
                self.done = true;
                Some((Err(Error::Io(e)), self))
            }
        }
    }
}

/// Lazily produce the frames of one upload: `Init` first, then data frames of exactly
/// `frame_size` bytes except possibly the last.
///
/// A missing path fails here, before any frame is produced. The name is `filename` if
/// given, else the path's basename or the reader's name.
pub async fn upload_frames(
    source: UploadSource,
    filename: Option<String>,
    frame_size: usize,
    progress: Option<Progress>,
) -> Result<BoxStream<'static, UploadFrame>> {
    if frame_size == 0 {
        return Err(Error::validation_with_context(
            "frame size must be positive",
            ErrorContext::new()
                .with_field_path("frame_size")
                .with_source("chunking"),
        ));
    }
    let name = filename
        .filter(|n| !n.is_empty())
        .or_else(|| source.default_name())
        .ok_or_else(|| {
            Error::validation_with_context(
                "filename is required",
                ErrorContext::new()
                    .with_field_path("filename")
                    .with_source("chunking"),
            )
        })?;

    let (input, total) = match source {
        UploadSource::Path(path) => {
            let meta = match tokio::fs::metadata(&path).await {
                Ok(meta) => meta,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    return Err(Error::NotFound { path })
                }
                Err(e) => return Err(Error::Io(e)),
            };
            if !meta.is_file() {
                return Err(Error::validation_with_context(
                    format!("{} is not a regular file", path.display()),
                    ErrorContext::new().with_field_path("path").with_source("chunking"),
                ));
            }
            let file = tokio::fs::File::open(&path).await?;
            (FrameInput::Reader(Box::new(file)), Some(meta.len()))
        }
        UploadSource::Bytes(data) => {
            let len = data.len() as u64;
            (FrameInput::Memory { data, offset: 0 }, Some(len))
        }
        UploadSource::Reader { reader, size, .. } => (FrameInput::Reader(reader), size),
    };

    debug!(filename = %name, total_bytes = ?total, frame_size, "preparing upload frames");

    let reader = FrameReader {
        input,
        frame_size,
        uploaded: 0,
        total,
        progress,
        done: false,
    };
    let init = stream::once(async move { Ok::<_, Error>(UploadFrame::init(name)) });
    let data = stream::unfold(reader, FrameReader::next_frame);
    Ok(Box::pin(init.chain(data)))
}
