//! # Uniform failure capture point.
//!
//! [`ErrorInterceptor::on_failure`] runs once per failed `run`, after retries are
//! exhausted and before the error is returned to the caller.
//!
//! ```text
//! on_failure(scope, error)
//!     ├─► error!(task, label, error)              always
//!     ├─► observer 1.on_failure ─► Ok(Some(h))  ─► handle kept
//!     │                         ├► Ok(None)     ─► nothing
//!     │                         ├► Err(e)       ─► warn!, continue
//!     │                         └► panic        ─► warn!, continue
//!     └─► observer N ...
//! ```
//!
//! Observers cannot alter or swallow the error; the caller always gets it back unchanged.
//!
//! **Warning**: `AssertUnwindSafe` is used, so an observer that panics while holding
//! a lock may leave shared state inconsistent.

use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tracing::{error, warn};

use crate::capabilities::{CapabilityChain, FailureScope};
use crate::context::EventHandle;
use crate::error::TaskError;

/// Runs the failure observers of a chain with isolation.
#[derive(Clone, Copy, Debug, Default)]
pub struct ErrorInterceptor;

impl ErrorInterceptor {
    /// Logs `error` and notifies every observer of `chain`. Returns collected handles.
    pub async fn on_failure(
        &self,
        chain: &CapabilityChain,
        scope: &FailureScope<'_>,
        err: &TaskError,
    ) -> Vec<EventHandle> {
        error!(task = scope.task, label = err.as_label(), error = %err, "task failed");

        let mut handles = Vec::new();
        for observer in chain.observers() {
            let fut = observer.on_failure(scope, err);
            match AssertUnwindSafe(fut).catch_unwind().await {
                Ok(Ok(Some(handle))) => handles.push(handle),
                Ok(Ok(None)) => {}
                Ok(Err(e)) => {
                    warn!(
                        task = scope.task,
                        observer = observer.name(),
                        label = e.as_label(),
                        error = %e,
                        "failure observer returned an error"
                    );
                }
                Err(panic_err) => {
                    let info = if let Some(msg) = panic_err.downcast_ref::<&'static str>() {
                        (*msg).to_string()
                    } else if let Some(msg) = panic_err.downcast_ref::<String>() {
                        msg.clone()
                    } else {
                        "unknown panic".to_string()
                    };
                    warn!(
                        task = scope.task,
                        observer = observer.name(),
                        panic = %info,
                        "failure observer panicked"
                    );
                }
            }
        }
        handles
    }
}
