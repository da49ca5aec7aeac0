//! File upload frames and file metadata.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// One frame of a streaming file upload.
///
/// A well-formed upload is exactly one [`UploadFrame::Init`] followed by zero or more
/// [`UploadFrame::Data`] frames in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadFrame {
    Init {
        name: String,
        /// Unused by the backend; always empty.
        purpose: String,
    },
    Data(Bytes),
}

impl UploadFrame {
    pub fn init(name: impl Into<String>) -> Self {
        UploadFrame::Init {
            name: name.into(),
            purpose: String::new(),
        }
    }

    pub fn is_init(&self) -> bool {
        matches!(self, UploadFrame::Init { .. })
    }

    /// Payload of a data frame.
    pub fn data(&self) -> Option<&Bytes> {
        match self {
            UploadFrame::Data(b) => Some(b),
            UploadFrame::Init { .. } => None,
        }
    }
}

/// Metadata of a stored file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileMetadata {
    pub id: String,
    pub filename: String,
    pub size: u64,
    pub team_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
}

/// Outcome of a file deletion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDeleted {
    pub id: String,
    pub deleted: bool,
}
