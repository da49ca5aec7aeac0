//! # Deferred Module
//!
//! Start-then-poll execution of long-running requests.
//!
//! A deferred request is started once and then queried by id until the server reports a
//! terminal status. Each iteration is a pure transition ([`advance`]) followed by a sleep
//! whose length comes from the [`PollTimer`]:
//!
//! | Status | Outcome |
//! |--------|---------|
//! | `Done` | the embedded result is returned |
//! | `Expired` | [`Error::Expired`] |
//! | `Pending` | sleep `min(remaining, interval)` and poll again, or [`Error::Timeout`] |
//! | anything else | [`Error::UnknownStatus`] |

pub mod timer;

pub use timer::PollTimer;

use crate::types::{DeferredPoll, DeferredStatus};
use crate::{Error, ErrorContext, Result};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info};

/// Next step of a poll loop.
#[derive(Debug, Clone, PartialEq)]
pub enum PollStep<T> {
    Ready(T),
    Wait(Duration),
}

/// Decide what to do with one poll result.
pub fn advance<T>(request_id: &str, poll: DeferredPoll<T>, timer: &PollTimer) -> Result<PollStep<T>> {
    match poll.status {
        DeferredStatus::Done => poll.response.map(PollStep::Ready).ok_or_else(|| {
            Error::invalid_response_with_context(
                "deferred request is done but carries no response",
                ErrorContext::new()
                    .with_field_path("response")
                    .with_details(request_id.to_string())
                    .with_source("deferred"),
            )
        }),
        DeferredStatus::Expired => Err(Error::Expired {
            request_id: request_id.to_string(),
            detail: poll.detail,
        }),
        DeferredStatus::Pending => Ok(PollStep::Wait(timer.next_sleep_or_fail()?)),
        DeferredStatus::Unknown(status) => Err(Error::UnknownStatus { status }),
    }
}

/// Poll `fetch` until the request completes, fails, or the timer runs out.
///
/// `fetch` must be a read-only status query; it is called once per iteration.
pub async fn poll_until_done<T, F, Fut>(request_id: &str, timer: PollTimer, fetch: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<DeferredPoll<T>>>,
{
    poll_with_sleep(request_id, timer, fetch, tokio::time::sleep).await
}

async fn poll_with_sleep<T, F, Fut, S, SFut>(
    request_id: &str,
    timer: PollTimer,
    mut fetch: F,
    mut sleep: S,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<DeferredPoll<T>>>,
    S: FnMut(Duration) -> SFut,
    SFut: Future<Output = ()>,
{
    let mut polls: u32 = 0;
    loop {
        let poll = fetch().await?;
        polls += 1;
        match advance(request_id, poll, &timer)? {
            PollStep::Ready(value) => {
                info!(request_id, polls, "deferred request completed");
                return Ok(value);
            }
            PollStep::Wait(wait) => {
                debug!(request_id, polls, sleep_ms = wait.as_millis() as u64, "deferred request pending");
                sleep(wait).await;
            }
        }
    }
}
