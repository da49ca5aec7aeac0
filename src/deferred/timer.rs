//! Poll timing for deferred requests.

use crate::{Error, Result};
use std::time::{Duration, Instant};

pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(10 * 60);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Tracks the total time budget of a poll loop and hands out the next sleep.
///
/// The sleep is clipped so the loop never oversleeps past the deadline.
#[derive(Debug, Clone, Copy)]
pub struct PollTimer {
    start: Instant,
    timeout: Duration,
    interval: Duration,
}

impl PollTimer {
    pub fn new(timeout: Option<Duration>, interval: Option<Duration>) -> Self {
        Self::starting_at(Instant::now(), timeout, interval)
    }

    pub fn starting_at(start: Instant, timeout: Option<Duration>, interval: Option<Duration>) -> Self {
        Self {
            start,
            timeout: timeout.unwrap_or(DEFAULT_POLL_TIMEOUT),
            interval: interval.unwrap_or(DEFAULT_POLL_INTERVAL),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Sleep before the next poll, or [`Error::Timeout`] once the budget is exceeded.
    pub fn next_sleep_or_fail(&self) -> Result<Duration> {
        self.next_sleep_at(Instant::now())
    }

    pub fn next_sleep_at(&self, now: Instant) -> Result<Duration> {
        let elapsed = now.saturating_duration_since(self.start);
        if elapsed > self.timeout {
            return Err(Error::Timeout {
                elapsed,
                timeout: self.timeout,
            });
        }
        Ok((self.timeout - elapsed).min(self.interval))
    }
}

impl Default for PollTimer {
    fn default() -> Self {
        Self::new(None, None)
    }
}
