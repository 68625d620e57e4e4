//! # Backoff policy for retried task actions.
//!
//! [`BackoffPolicy`] controls how the delay between two attempts of an action grows.
//! The delay after retry `n` (0-indexed) is
//!
//! ```text
//! first × factor^n + step × n   (clamped to max, then jittered)
//! ```
//!
//! `factor` gives exponential growth, `step` gives linear growth; both can be mixed.
//! The base delay is derived purely from the retry number, so jitter never feeds back
//! into later delays.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use taskctl::{BackoffPolicy, JitterPolicy};
//!
//! let backoff = BackoffPolicy {
//!     first: Duration::from_millis(100),
//!     max: Duration::from_secs(10),
//!     factor: 2.0,
//!     step: Duration::ZERO,
//!     jitter: JitterPolicy::None,
//! };
//! assert_eq!(backoff.next(0), Duration::from_millis(100));
//! assert_eq!(backoff.next(1), Duration::from_millis(200));
//! assert_eq!(backoff.next(10), Duration::from_secs(10));
//!
//! // Linear: 5s, then +2s per retry.
//! let linear = BackoffPolicy::linear(Duration::from_secs(5), Duration::from_secs(2));
//! assert_eq!(linear.next(2), Duration::from_secs(9));
//! ```

use std::time::Duration;

use crate::policies::jitter::JitterPolicy;

/// Retry backoff policy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackoffPolicy {
    /// Delay before the first retry.
    pub first: Duration,
    /// Maximum delay cap.
    pub max: Duration,
    /// Multiplicative growth factor (`1.0` = no exponential growth).
    pub factor: f64,
    /// Linear increment added per retry.
    pub step: Duration,
    /// Jitter policy applied to the clamped base delay.
    pub jitter: JitterPolicy,
}

impl Default for BackoffPolicy {
    /// Returns a constant policy:
    /// - `first = 100ms`;
    /// - `factor = 1.0`, `step = 0`;
    /// - `max = 30s`.
    fn default() -> Self {
        Self {
            first: Duration::from_millis(100),
            max: Duration::from_secs(30),
            factor: 1.0,
            step: Duration::ZERO,
            jitter: JitterPolicy::None,
        }
    }
}

impl BackoffPolicy {
    /// Linear policy: `first`, then `first + step`, `first + 2·step`, ...
    ///
    /// The cap is effectively unbounded (one day), matching interval-driven retries
    /// where the caller chooses the growth explicitly.
    pub fn linear(first: Duration, step: Duration) -> Self {
        Self {
            first,
            max: Duration::from_secs(24 * 60 * 60),
            factor: 1.0,
            step,
            jitter: JitterPolicy::None,
        }
    }

    /// Computes the delay before retry number `retry` (0-indexed).
    ///
    /// Non-finite or negative intermediate values clamp to [`BackoffPolicy::max`].
    pub fn next(&self, retry: u32) -> Duration {
        let max_secs = self.max.as_secs_f64();
        let exp = retry.min(i32::MAX as u32) as i32;
        let unclamped_secs = self.first.as_secs_f64() * self.factor.powi(exp)
            + self.step.as_secs_f64() * f64::from(retry);

        let base =
            if !unclamped_secs.is_finite() || unclamped_secs < 0.0 || unclamped_secs > max_secs {
                self.max
            } else {
                Duration::from_secs_f64(unclamped_secs)
            };

        match self.jitter {
            JitterPolicy::Decorrelated => {
                self.jitter
                    .apply_decorrelated(self.first.min(self.max), base, self.max)
            }
            _ => self.jitter.apply(base),
        }
    }
}
