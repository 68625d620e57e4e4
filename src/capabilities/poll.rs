//! # Polling helper for long-running remote operations.
//!
//! A task that starts a remote job and waits for it uses a [`Poller`] obtained from
//! [`TaskContext::poller`](crate::TaskContext::poller):
//!
//! ```text
//! loop {
//!   ├─► count += 1
//!   ├─► f(count) ─► Complete(v) ─► return v
//!   │            └► Pending
//!   ├─► max_polls reached? ─► Fail
//!   ├─► sleep(interval)
//!   └─► every `every` polls: interval += step
//! }
//! ```
//!
//! Defaults: first interval 1s, +1s every 3 polls, unbounded.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::error::TaskError;

/// Poll interval growth.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollPolicy {
    /// Interval after the first poll.
    pub first: Duration,
    /// Increment applied every `every` polls.
    pub step: Duration,
    /// Number of polls per interval level (`0` = never grow).
    pub every: u32,
    /// Optional cap on the number of polls.
    pub max_polls: Option<u32>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            first: Duration::from_secs(1),
            step: Duration::from_secs(1),
            every: 3,
            max_polls: None,
        }
    }
}

/// Result of one poll.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PollStatus<T> {
    /// Not done yet; poll again.
    Pending,
    /// Done with a value.
    Complete(T),
}

/// Stateful poll loop.
#[derive(Debug)]
pub struct Poller {
    policy: PollPolicy,
    count: u32,
    level: u32,
    interval: Duration,
}

impl Poller {
    pub fn new(policy: PollPolicy) -> Self {
        Self {
            policy,
            count: 0,
            level: 0,
            interval: policy.first,
        }
    }

    /// Polls performed so far.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Interval that will be slept before the next poll.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Calls `f` until it returns [`PollStatus::Complete`].
    ///
    /// `f` receives the 1-based poll number. Errors from `f` end the loop immediately.
    pub async fn poll<T, F, Fut>(&mut self, mut f: F) -> Result<T, TaskError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<PollStatus<T>, TaskError>>,
    {
        loop {
            self.count += 1;
            if let PollStatus::Complete(value) = f(self.count).await? {
                return Ok(value);
            }

            if let Some(max) = self.policy.max_polls {
                if self.count >= max {
                    return Err(TaskError::fail(format!(
                        "operation did not complete after {max} polls"
                    )));
                }
            }

            debug!(
                poll = self.count,
                interval_ms = self.interval.as_millis() as u64,
                "operation pending"
            );
            if !self.interval.is_zero() {
                tokio::time::sleep(self.interval).await;
            }
            self.update_interval();
        }
    }

    fn update_interval(&mut self) {
        if self.policy.every == 0 {
            return;
        }
        if self.count / self.policy.every > self.level {
            self.level += 1;
            self.interval = self.interval.saturating_add(self.policy.step);
        }
    }
}
