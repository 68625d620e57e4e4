//! # Retry capability.
//!
//! Wraps the action invocation so that retryable failures ([`TaskError::Fail`]) are
//! attempted again after a backoff delay. From the caller's point of view the action
//! still runs once: `run` returns the first success or the final failure.
//!
//! ## Placement
//! Retries happen **inside** failure interception. Observers only see the failure
//! that survives the last attempt; a run that fails twice then succeeds reports nothing.
//!
//! ```text
//! run()
//!  └─► RetryStrategy::run
//!        loop {
//!          ├─► attempt += 1
//!          ├─► task.run_task(ctx{attempt})
//!          │     ├─ Ok            ─► return Ok
//!          │     ├─ Err(Fatal)    ─► return Err
//!          │     └─ Err(Fail)     ─► attempts left?
//!          │                          ├─ no  ─► return Err
//!          │                          └─ yes ─► sleep(backoff.next(attempt-1))
//!        }
//!  └─► on Err: ErrorInterceptor::on_failure (once)
//! ```
//!
//! ## Option-driven retries
//! [`RetryStrategy::FromOptions`] reads the policy from the task's resolved options:
//! - `retries`: extra attempts after the first (default 0)
//! - `retry_interval`: seconds before the first retry (default 0)
//! - `retry_interval_add`: seconds added to the interval after each retry (default 0)
//!
//! Values may be numbers or numeric strings.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::TaskError;
use crate::options::OptionSet;
use crate::policies::BackoffPolicy;
use crate::tasks::{Task, TaskContext, TaskOutput};

/// Fixed retry parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first one (`0` is treated as `1`).
    pub max_attempts: u32,
    /// Delay between attempts.
    pub backoff: BackoffPolicy,
}

impl Default for RetryPolicy {
    /// Three attempts with the default (constant 100ms) backoff.
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: BackoffPolicy::default(),
        }
    }
}

impl RetryPolicy {
    /// Policy with `max_attempts` total attempts and default backoff.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    /// Single attempt, no retries.
    pub fn once() -> Self {
        Self::new(1)
    }

    /// Returns the policy with a different backoff.
    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    /// Reads `retries`, `retry_interval` and `retry_interval_add` from `options`.
    ///
    /// Missing or unparsable values count as `0`.
    pub fn from_options(options: &OptionSet) -> Self {
        let retries = read_number(options, "retries").max(0.0) as u32;
        let interval = read_number(options, "retry_interval").max(0.0);
        let add = read_number(options, "retry_interval_add").max(0.0);

        Self {
            max_attempts: retries.saturating_add(1),
            backoff: BackoffPolicy::linear(seconds(interval), seconds(add)),
        }
    }

    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// Out-of-range seconds saturate; the backoff cap clamps the delay afterwards.
fn seconds(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

fn read_number(options: &OptionSet, name: &str) -> f64 {
    let parsed = match options.get(name) {
        None | Some(Value::Null) => return 0.0,
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };
    match parsed {
        Some(n) if n.is_finite() => n,
        _ => {
            warn!(option = name, "ignoring non-numeric retry option");
            0.0
        }
    }
}

/// How a task type retries its action.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RetryStrategy {
    /// Fixed policy declared with the task type.
    Policy(RetryPolicy),
    /// Policy read from the resolved options at run time.
    FromOptions,
}

impl From<RetryPolicy> for RetryStrategy {
    fn from(policy: RetryPolicy) -> Self {
        RetryStrategy::Policy(policy)
    }
}

impl RetryStrategy {
    /// Effective policy for one run.
    pub fn policy_for(&self, options: &OptionSet) -> RetryPolicy {
        match self {
            RetryStrategy::Policy(policy) => *policy,
            RetryStrategy::FromOptions => RetryPolicy::from_options(options),
        }
    }

    /// Runs `task` under the effective policy.
    pub async fn run(
        &self,
        task: &mut dyn Task,
        ctx: &TaskContext,
    ) -> Result<TaskOutput, TaskError> {
        let policy = self.policy_for(ctx.options());
        let max_attempts = policy.attempts();
        let mut attempt: u32 = 1;

        loop {
            let res = task.run_task(&ctx.with_attempt(attempt)).await;
            match res {
                Ok(output) => {
                    if attempt > 1 {
                        debug!(task = ctx.name(), attempt, "task succeeded after retry");
                    }
                    return Ok(output);
                }
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    let delay = policy.backoff.next(attempt - 1);
                    warn!(
                        task = ctx.name(),
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "attempt failed, retrying"
                    );
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::OptionMap;
    use serde_json::json;

    fn options(value: Value) -> OptionSet {
        OptionSet::from(value.as_object().cloned().unwrap_or_else(OptionMap::new))
    }

    #[test]
    fn test_from_options_defaults_to_single_attempt() {
        let policy = RetryPolicy::from_options(&OptionSet::default());
        assert_eq!(policy.max_attempts, 1);
        assert_eq!(policy.backoff.next(0), Duration::ZERO);
    }

    #[test]
    fn test_from_options_reads_numbers_and_strings() {
        let policy = RetryPolicy::from_options(&options(json!({
            "retries": "2",
            "retry_interval": 5,
            "retry_interval_add": "1.5"
        })));
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.backoff.next(0), Duration::from_secs(5));
        assert_eq!(policy.backoff.next(1), Duration::from_millis(6500));
    }

    #[test]
    fn test_from_options_ignores_garbage() {
        let policy = RetryPolicy::from_options(&options(json!({
            "retries": "many",
            "retry_interval": [1]
        })));
        assert_eq!(policy.max_attempts, 1);
    }

    #[test]
    fn test_from_options_saturates_huge_intervals() {
        let policy = RetryPolicy::from_options(&options(json!({
            "retries": 1,
            "retry_interval": 1e300,
            "retry_interval_add": "1e300"
        })));
        let day = Duration::from_secs(24 * 60 * 60);
        assert_eq!(policy.max_attempts, 2);
        assert_eq!(policy.backoff.next(0), day);
        assert_eq!(policy.backoff.next(3), day);
    }

    #[test]
    fn test_zero_attempts_means_one() {
        assert_eq!(RetryPolicy::new(0).attempts(), 1);
    }

    #[test]
    fn test_strategy_prefers_declared_policy() {
        let strategy = RetryStrategy::from(RetryPolicy::new(5));
        let opts = options(json!({ "retries": 1 }));
        assert_eq!(strategy.policy_for(&opts).max_attempts, 5);
        assert_eq!(RetryStrategy::FromOptions.policy_for(&opts).max_attempts, 2);
    }
}
