//! # Controller construction.
//!
//! [`ControllerBuilder::build`] runs the construction sequence in a fixed order.
//! Any failure aborts it and no controller is returned.
//!
//! ```text
//! 1. requires_org && org is None      ─► BuildError::MissingCredentials
//! 2. enter span "task" (task = name)
//! 3. chain.init_all(scope)            ─► BuildError::Hook
//! 4. OptionSet::resolve(config, overrides, contexts)
//! 5. chain.validate(definition, options) ─► BuildError::Options
//! 6. task.update_credentials(ctx)     ─► BuildError::Hook
//! 7. task.init_task(ctx)              ─► BuildError::Hook
//!                                      ─► TaskController (Ready)
//! ```
//!
//! Indirection sources: every context added with [`ControllerBuilder::context`], then
//! `project_config` (the project) and `org_config` (the org, if any). The two
//! built-in names take precedence over user contexts with the same name.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info_span};

use crate::capabilities::InitScope;
use crate::context::{AttributeSource, Contexts, OrgContext, ProjectContext};
use crate::controller::{Lifecycle, TaskController};
use crate::error::{BuildError, TaskError};
use crate::options::{OptionMap, OptionSet, TaskConfig};
use crate::tasks::{Task, TaskContext, TaskType};

/// Context name of the project for `$project_config.<path>` references.
pub const PROJECT_CONTEXT: &str = "project_config";
/// Context name of the org for `$org_config.<path>` references.
pub const ORG_CONTEXT: &str = "org_config";

/// Builder for [`TaskController`].
pub struct ControllerBuilder {
    task_type: Arc<TaskType>,
    config: TaskConfig,
    project: Arc<dyn ProjectContext>,
    org: Option<Arc<dyn OrgContext>>,
    flow: Option<String>,
    overrides: OptionMap,
    contexts: Contexts,
}

impl ControllerBuilder {
    pub fn new(
        task_type: Arc<TaskType>,
        config: TaskConfig,
        project: Arc<dyn ProjectContext>,
    ) -> Self {
        Self {
            task_type,
            config,
            project,
            org: None,
            flow: None,
            overrides: OptionMap::new(),
            contexts: Contexts::new(),
        }
    }

    /// Target org of this invocation.
    pub fn org(mut self, org: Arc<dyn OrgContext>) -> Self {
        self.org = Some(org);
        self
    }

    /// Marks the invocation as a step of the named flow.
    pub fn flow(mut self, step: impl Into<String>) -> Self {
        self.flow = Some(step.into());
        self
    }

    /// Overrides one option; overrides win over config values.
    pub fn override_option(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.overrides.insert(name.into(), value.into());
        self
    }

    /// Overrides several options at once.
    pub fn overrides(mut self, overrides: OptionMap) -> Self {
        self.overrides.extend(overrides);
        self
    }

    /// Registers an extra source for `$<name>.<path>` references.
    pub fn context(mut self, name: impl Into<String>, source: Arc<dyn AttributeSource>) -> Self {
        self.contexts.insert(name, source);
        self
    }

    /// Runs the construction sequence with `task` as the action.
    pub fn build(self, task: impl Task) -> Result<TaskController, BuildError> {
        let Self {
            task_type,
            config,
            project,
            org,
            flow,
            overrides,
            mut contexts,
        } = self;
        let name = task_type.name().to_string();

        if task_type.requires_org() && org.is_none() {
            return Err(BuildError::MissingCredentials { task: name });
        }

        let span = info_span!("task", task = %name);
        let entered = span.enter();
        let mut state = Lifecycle::Created;
        advance(&name, &mut state, Lifecycle::Initializing);

        let scope = InitScope {
            task: &name,
            config: &config,
            project: project.as_ref(),
            org: org.as_deref(),
        };
        task_type.chain().init_all(&scope)?;

        contexts.insert(PROJECT_CONTEXT, Arc::new(project.clone()));
        if let Some(org) = &org {
            contexts.insert(ORG_CONTEXT, Arc::new(org.clone()));
        }
        let options = OptionSet::resolve(&config.options, &overrides, &contexts);

        task_type
            .chain()
            .validate(&name, task_type.definition(), &options)?;
        advance(&name, &mut state, Lifecycle::Validated);

        let ctx = TaskContext::new(
            &name,
            options,
            project,
            org,
            flow.as_deref(),
            task_type.poll_policy(),
        );
        let mut task: Box<dyn Task> = Box::new(task);
        task.update_credentials(&ctx)
            .map_err(|e| hook_error(&name, "update_credentials", e))?;
        task.init_task(&ctx)
            .map_err(|e| hook_error(&name, "init_task", e))?;
        advance(&name, &mut state, Lifecycle::Ready);

        drop(entered);
        Ok(TaskController::new(task_type, task, ctx, span))
    }
}

fn advance(task: &str, state: &mut Lifecycle, next: Lifecycle) {
    debug!(task, from = %state, to = %next, "lifecycle transition");
    *state = next;
}

fn hook_error(task: &str, stage: &'static str, err: TaskError) -> BuildError {
    BuildError::Hook {
        task: task.to_string(),
        stage,
        error: err.to_string(),
    }
}
