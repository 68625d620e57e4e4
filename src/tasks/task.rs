//! # The action contract of a task.
//!
//! A [`Task`] is the user-defined part of a controller. The controller calls its
//! methods in a fixed order:
//!
//! ```text
//! build():  update_credentials(ctx) ─► init_task(ctx)
//! run():    run_task(ctx)            (possibly several attempts under a retry strategy)
//! ```
//!
//! Both construction hooks default to no-ops.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::TaskError;
use crate::options::OptionMap;
use crate::tasks::TaskContext;

/// Output of one successful action.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaskOutput {
    /// Opaque result value (`null` by default).
    pub result: Value,
    /// Named values handed back to the caller of `run`.
    pub return_values: OptionMap,
}

impl TaskOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the opaque result.
    pub fn with_result(mut self, result: impl Into<Value>) -> Self {
        self.result = result.into();
        self
    }

    /// Adds one return value.
    pub fn with_return(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.return_values.insert(name.into(), value.into());
        self
    }
}

/// # User-defined action of a task type.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use taskctl::{Task, TaskContext, TaskError, TaskOutput};
///
/// struct Echo;
///
/// #[async_trait]
/// impl Task for Echo {
///     async fn run_task(&mut self, ctx: &TaskContext) -> Result<TaskOutput, TaskError> {
///         let msg = ctx.options().get_str("message").unwrap_or("hello");
///         Ok(TaskOutput::new().with_return("message", msg))
///     }
/// }
/// ```
#[async_trait]
pub trait Task: Send + 'static {
    /// Refreshes credentials before the task is used. Runs during construction.
    fn update_credentials(&mut self, _ctx: &TaskContext) -> Result<(), TaskError> {
        Ok(())
    }

    /// Task-specific setup once options are validated. Runs during construction.
    fn init_task(&mut self, _ctx: &TaskContext) -> Result<(), TaskError> {
        Ok(())
    }

    /// Performs the work.
    async fn run_task(&mut self, ctx: &TaskContext) -> Result<TaskOutput, TaskError>;
}

/// Action that does nothing and produces a `null` result.
#[derive(Clone, Copy, Debug, Default)]
pub struct Noop;

#[async_trait]
impl Task for Noop {
    async fn run_task(&mut self, _ctx: &TaskContext) -> Result<TaskOutput, TaskError> {
        Ok(TaskOutput::default())
    }
}
