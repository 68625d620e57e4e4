//! # Optional behaviors a task type opts into.
//!
//! - [`OptionHandler`]: [`RequiredOptions`] (default) or [`SchemaOptions`]
//! - [`LifecycleHook`]: construction-time hooks, e.g. [`HookFn`]
//! - [`FailureObserver`]: sees the final failure of a run
//! - [`ErrorReporting`]: hook + observer sending failures to the project's reporter
//! - [`RetryStrategy`]: wraps the action invocation
//! - [`Poller`]: polling helper for tasks waiting on remote work
//!
//! Capabilities are declared in order on a [`CapabilityChain`].

mod chain;
mod hook;
mod observer;
mod options;
mod poll;
mod reporting;
mod retry;

pub use chain::{Capability, CapabilityChain, IntoCapabilities};
pub use hook::{HookFn, InitScope, LifecycleHook};
pub use observer::{FailureObserver, FailureScope};
pub use options::{OptionHandler, RequiredOptions, SchemaOptions};
pub use poll::{PollPolicy, PollStatus, Poller};
pub use reporting::{ErrorReporting, OPTION_TAG_PREFIX};
pub use retry::{RetryPolicy, RetryStrategy};
