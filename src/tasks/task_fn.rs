//! # Function-backed task (`TaskFn`)
//!
//! [`TaskFn`] wraps a closure `F: Fn(TaskContext) -> Fut`, producing a fresh future
//! per attempt. The closure receives an owned context; shared state across attempts
//! must be captured explicitly (e.g. `Arc<AtomicU32>`).
//!
//! ## Example
//! ```rust
//! use taskctl::{TaskContext, TaskError, TaskFn, TaskOutput};
//!
//! let task = TaskFn::new(|ctx: TaskContext| async move {
//!     Ok::<_, TaskError>(TaskOutput::new().with_return("attempt", ctx.attempt()))
//! });
//! # let _ = task;
//! ```

use std::fmt;
use std::future::Future;

use async_trait::async_trait;

use crate::error::TaskError;
use crate::tasks::{Task, TaskContext, TaskOutput};

/// Function-backed action.
pub struct TaskFn<F> {
    f: F,
}

impl<F> TaskFn<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> fmt::Debug for TaskFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TaskFn")
    }
}

#[async_trait]
impl<F, Fut> Task for TaskFn<F>
where
    F: Fn(TaskContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<TaskOutput, TaskError>> + Send + 'static,
{
    async fn run_task(&mut self, ctx: &TaskContext) -> Result<TaskOutput, TaskError> {
        (self.f)(ctx.clone()).await
    }
}
