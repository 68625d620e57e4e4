use std::sync::Arc;

use serde_json::Value;
use tracing::{Instrument, Span, debug, info};

use crate::capabilities::FailureScope;
use crate::context::{EventHandle, ProjectContext};
use crate::controller::{ControllerBuilder, ErrorInterceptor, Lifecycle};
use crate::error::TaskError;
use crate::options::{OptionMap, OptionSet, TaskConfig};
use crate::tasks::{Task, TaskContext, TaskType};

/// One single-use task instance.
///
/// Built by [`ControllerBuilder`]; always starts in [`Lifecycle::Ready`].
/// [`run`](Self::run) executes the action at most once.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use taskctl::{Noop, OptionSpec, ProjectConfig, TaskConfig, TaskController, TaskType};
///
/// # tokio_test_block(async {
/// let deploy = TaskType::builder("Deploy")
///     .option(OptionSpec::required("path", "Source directory"))
///     .build()
///     .unwrap();
///
/// let mut controller = TaskController::builder(deploy, TaskConfig::default(), Arc::new(ProjectConfig::default()))
///     .override_option("path", "/tmp")
///     .build(Noop)
///     .unwrap();
///
/// assert_eq!(controller.options().get_str("path"), Some("/tmp"));
/// controller.run().await.unwrap();
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) {
/// #     tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(f);
/// # }
/// ```
pub struct TaskController {
    task_type: Arc<TaskType>,
    task: Box<dyn Task>,
    ctx: TaskContext,
    span: Span,
    state: Lifecycle,
    result: Option<Value>,
    return_values: OptionMap,
    report_events: Vec<EventHandle>,
}

impl TaskController {
    /// Starts building a controller for `task_type`.
    pub fn builder(
        task_type: Arc<TaskType>,
        config: TaskConfig,
        project: Arc<dyn ProjectContext>,
    ) -> ControllerBuilder {
        ControllerBuilder::new(task_type, config, project)
    }

    pub(crate) fn new(
        task_type: Arc<TaskType>,
        task: Box<dyn Task>,
        ctx: TaskContext,
        span: Span,
    ) -> Self {
        Self {
            task_type,
            task,
            ctx,
            span,
            state: Lifecycle::Ready,
            result: None,
            return_values: OptionMap::new(),
            report_events: Vec::new(),
        }
    }

    /// Executes the action once and returns its return values.
    ///
    /// On failure the error goes through the [`ErrorInterceptor`] and is then
    /// returned unchanged. Calling `run` again returns [`TaskError::NotReady`]
    /// without touching the action or the interceptor.
    pub async fn run(&mut self) -> Result<OptionMap, TaskError> {
        if self.state != Lifecycle::Ready {
            return Err(TaskError::NotReady { state: self.state });
        }
        let span = self.span.clone();
        self.execute().instrument(span).await
    }

    async fn execute(&mut self) -> Result<OptionMap, TaskError> {
        self.log_begin();
        self.transition(Lifecycle::Executing);

        let res = self
            .task_type
            .chain()
            .invoke(self.task.as_mut(), &self.ctx)
            .await;

        match res {
            Ok(output) => {
                self.result = Some(output.result);
                self.return_values = output.return_values;
                self.transition(Lifecycle::Completed);
                Ok(self.return_values.clone())
            }
            Err(err) => {
                self.transition(Lifecycle::Failed);
                let scope = FailureScope {
                    task: self.ctx.name(),
                    options: self.ctx.options(),
                    project: self.ctx.project(),
                    org: self.ctx.org(),
                };
                let events = ErrorInterceptor
                    .on_failure(self.task_type.chain(), &scope, &err)
                    .await;
                self.report_events.extend(events);
                Err(err)
            }
        }
    }

    fn log_begin(&self) {
        info!(task = self.ctx.name(), "beginning task");
        if !self.task_type.requires_org() || self.ctx.flow().is_some() {
            return;
        }
        if let Some(org) = self.ctx.org() {
            info!(
                username = org.username().unwrap_or_default(),
                org_id = org.org_id().unwrap_or_default(),
                "as user in org"
            );
        }
    }

    fn transition(&mut self, next: Lifecycle) {
        debug!(task = self.ctx.name(), from = %self.state, to = %next, "lifecycle transition");
        self.state = next;
    }

    pub fn state(&self) -> Lifecycle {
        self.state
    }

    pub fn task_type(&self) -> &Arc<TaskType> {
        &self.task_type
    }

    /// Resolved and validated options.
    pub fn options(&self) -> &OptionSet {
        self.ctx.options()
    }

    /// Context handed to the action.
    pub fn context(&self) -> &TaskContext {
        &self.ctx
    }

    /// Opaque result of a successful run (`None` before success).
    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    /// Return values of a successful run (empty before success).
    pub fn return_values(&self) -> &OptionMap {
        &self.return_values
    }

    /// Event handles returned by failure observers.
    pub fn report_events(&self) -> &[EventHandle] {
        &self.report_events
    }
}

impl std::fmt::Debug for TaskController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskController")
            .field("task", &self.task_type.name())
            .field("state", &self.state)
            .field("options", self.ctx.options())
            .finish()
    }
}
