//! # Task types and actions.
//!
//! This module provides the task-related types:
//! - [`TaskType`] - name, option definition and capabilities of a kind of task
//! - [`Task`] - trait implemented by the action
//! - [`TaskFn`] - closure-backed action
//! - [`Noop`] - default action producing a `null` result
//! - [`TaskContext`] - what the action sees (options, contexts, attempt)
//! - [`TaskOutput`] - result and return values of a successful action

mod context;
mod task;
mod task_fn;
mod task_type;

pub use context::TaskContext;
pub use task::{Noop, Task, TaskOutput};
pub use task_fn::TaskFn;
pub use task_type::{TaskType, TaskTypeBuilder};
