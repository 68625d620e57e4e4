//! Delay policies shared by the retry and poll capabilities.
//!
//! ## Contents
//! - [`BackoffPolicy`] how retry delays evolve (first / factor / step / max + jitter)
//! - [`JitterPolicy`]  randomization strategy applied on top of the base delay
//!
//! ## Quick wiring
//! ```text
//! RetryPolicy { max_attempts, backoff: BackoffPolicy }
//!      └─► capabilities::retry uses backoff.next(attempt) between attempts
//! ```
//!
//! ## Defaults
//! - `BackoffPolicy::default()` → first=100ms, factor=1.0, step=0, max=30s, jitter=None.
//! - `JitterPolicy::None` by default.

mod backoff;
mod jitter;

pub use backoff::BackoffPolicy;
pub use jitter::JitterPolicy;
