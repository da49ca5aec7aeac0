//! Deferred (polled) request status.

use serde::{Deserialize, Serialize};

/// Status of a deferred request as reported by the server.
///
/// The set is closed from the client's point of view: anything that is not one of the
/// known values lands in [`DeferredStatus::Unknown`] and is treated as fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeferredStatus {
    Pending,
    Done,
    Expired,
    Unknown(String),
}

impl From<String> for DeferredStatus {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "pending" => DeferredStatus::Pending,
            "done" => DeferredStatus::Done,
            "expired" => DeferredStatus::Expired,
            _ => DeferredStatus::Unknown(s),
        }
    }
}

impl From<DeferredStatus> for String {
    fn from(s: DeferredStatus) -> Self {
        match s {
            DeferredStatus::Pending => "pending".to_string(),
            DeferredStatus::Done => "done".to_string(),
            DeferredStatus::Expired => "expired".to_string(),
            DeferredStatus::Unknown(raw) => raw,
        }
    }
}

impl DeferredStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, DeferredStatus::Done | DeferredStatus::Expired)
    }
}

impl std::fmt::Display for DeferredStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeferredStatus::Pending => f.write_str("pending"),
            DeferredStatus::Done => f.write_str("done"),
            DeferredStatus::Expired => f.write_str("expired"),
            DeferredStatus::Unknown(s) => write!(f, "unknown({})", s),
        }
    }
}

/// Result of one status query for a deferred request.
#[derive(Debug, Clone, PartialEq)]
pub struct DeferredPoll<T> {
    pub status: DeferredStatus,
    /// Present once `status` is [`DeferredStatus::Done`].
    pub response: Option<T>,
    /// Free-form server detail (e.g. the raw REST status), used in error messages.
    pub detail: Option<String>,
}

impl<T> DeferredPoll<T> {
    pub fn pending() -> Self {
        Self {
            status: DeferredStatus::Pending,
            response: None,
            detail: None,
        }
    }

    pub fn done(response: T) -> Self {
        Self {
            status: DeferredStatus::Done,
            response: Some(response),
            detail: None,
        }
    }

    pub fn expired() -> Self {
        Self {
            status: DeferredStatus::Expired,
            response: None,
            detail: None,
        }
    }

    pub fn unknown(status: impl Into<String>) -> Self {
        Self {
            status: DeferredStatus::Unknown(status.into()),
            response: None,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}
