use async_trait::async_trait;

use crate::context::{EventHandle, OrgContext, ProjectContext};
use crate::error::{ReportError, TaskError};
use crate::options::OptionSet;

/// What a failure observer can see about the failed task.
pub struct FailureScope<'a> {
    /// Task type name.
    pub task: &'a str,
    /// Resolved options of the failed instance.
    pub options: &'a OptionSet,
    /// Project context.
    pub project: &'a dyn ProjectContext,
    /// Org context, if any.
    pub org: Option<&'a dyn OrgContext>,
}

/// Observes action failures. Observers never change or swallow the error.
///
/// Observers are stackable and run in declaration order. Returned errors and
/// panics are isolated by the interceptor and only logged.
#[async_trait]
pub trait FailureObserver: Send + Sync + 'static {
    /// Called once per failed `run`. May return a handle for later inspection.
    async fn on_failure(
        &self,
        scope: &FailureScope<'_>,
        error: &TaskError,
    ) -> Result<Option<EventHandle>, ReportError>;

    /// Observer name used in logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
