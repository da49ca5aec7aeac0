//! Upload progress reporting.

use std::fmt;
use std::sync::Arc;

/// Progress sink with an `update(n)` method, in the style of terminal progress bars.
pub trait ProgressUpdate: Send + Sync {
    /// Advance by `n` bytes.
    fn update(&self, n: u64);
}

/// Callback invoked once per uploaded data frame.
#[derive(Clone)]
pub enum Progress {
    /// `(bytes_uploaded_so_far, total_bytes_if_known)`.
    ByTotal(Arc<dyn Fn(u64, Option<u64>) + Send + Sync>),
    /// Size of the frame that was just produced.
    ByDelta(Arc<dyn Fn(u64) + Send + Sync>),
    Updatable(Arc<dyn ProgressUpdate>),
}

impl Progress {
    pub fn by_total(f: impl Fn(u64, Option<u64>) + Send + Sync + 'static) -> Self {
        Progress::ByTotal(Arc::new(f))
    }

    pub fn by_delta(f: impl Fn(u64) + Send + Sync + 'static) -> Self {
        Progress::ByDelta(Arc::new(f))
    }

    pub fn updatable(sink: Arc<dyn ProgressUpdate>) -> Self {
        Progress::Updatable(sink)
    }

    pub(crate) fn report(&self, uploaded: u64, total: Option<u64>, delta: u64) {
        match self {
            Progress::ByTotal(f) => f(uploaded, total),
            Progress::ByDelta(f) => f(delta),
            Progress::Updatable(sink) => sink.update(delta),
        }
    }
}

impl fmt::Debug for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Progress::ByTotal(_) => "ByTotal",
            Progress::ByDelta(_) => "ByDelta",
            Progress::Updatable(_) => "Updatable",
        };
        write!(f, "Progress::{}", kind)
    }
}
