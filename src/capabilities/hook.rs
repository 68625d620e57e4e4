//! # Construction-time hooks.
//!
//! A [`LifecycleHook`] runs during step 3 of controller construction, before options
//! are resolved. Hooks see the raw config and the shared contexts, never the task.
//!
//! [`HookFn`] wraps a closure, the same way [`TaskFn`](crate::TaskFn) wraps an action.

use crate::context::{OrgContext, ProjectContext};
use crate::error::TaskError;
use crate::options::TaskConfig;

/// What an init hook can see.
pub struct InitScope<'a> {
    /// Task type name.
    pub task: &'a str,
    /// Raw config of this invocation.
    pub config: &'a TaskConfig,
    /// Project context.
    pub project: &'a dyn ProjectContext,
    /// Org context, if any.
    pub org: Option<&'a dyn OrgContext>,
}

/// Hook invoked once per controller construction, in declaration order.
pub trait LifecycleHook: Send + Sync + 'static {
    /// Runs the hook. An error aborts construction.
    fn on_init(&self, scope: &InitScope<'_>) -> Result<(), TaskError>;

    /// Hook name used in logs and construction errors.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Closure-backed hook.
pub struct HookFn<F> {
    name: &'static str,
    f: F,
}

impl<F> HookFn<F>
where
    F: Fn(&InitScope<'_>) -> Result<(), TaskError> + Send + Sync + 'static,
{
    pub fn new(name: &'static str, f: F) -> Self {
        Self { name, f }
    }
}

impl<F> LifecycleHook for HookFn<F>
where
    F: Fn(&InitScope<'_>) -> Result<(), TaskError> + Send + Sync + 'static,
{
    fn on_init(&self, scope: &InitScope<'_>) -> Result<(), TaskError> {
        (self.f)(scope)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
