//! # External error reporting capability.
//!
//! [`ErrorReporting`] is both a [`LifecycleHook`] (it opens the project's reporting
//! session during construction) and a [`FailureObserver`] (it sends one report per
//! failed run when reporting is enabled).
//!
//! ## Tags
//! ```text
//! task          → task type name
//! org_username  → org username           (only with an org)
//! scratch_org   → org is scratch         (only with an org)
//! option_<name> → resolved option value  (every option, verbatim)
//! ```
//!
//! Option values are tagged verbatim, secrets and nulls included. Anything sensitive
//! passed as an option ends up at the reporting backend.

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use crate::capabilities::hook::{InitScope, LifecycleHook};
use crate::capabilities::observer::{FailureObserver, FailureScope};
use crate::context::{ErrorReport, ErrorTags, EventHandle};
use crate::error::{ReportError, TaskError};

/// Prefix of per-option tags.
pub const OPTION_TAG_PREFIX: &str = "option_";

/// Reports failures through [`ProjectContext::report_error`](crate::ProjectContext::report_error).
#[derive(Clone, Copy, Debug, Default)]
pub struct ErrorReporting;

impl ErrorReporting {
    pub fn new() -> Self {
        Self
    }

    /// Builds the tag set for a failure.
    pub fn tags(scope: &FailureScope<'_>) -> ErrorTags {
        let mut tags = ErrorTags::new();
        tags.insert("task".into(), Value::String(scope.task.to_string()));

        if let Some(org) = scope.org {
            let username = org.username().map(str::to_string).map_or(Value::Null, Value::String);
            tags.insert("org_username".into(), username);
            tags.insert("scratch_org".into(), Value::Bool(org.is_scratch()));
        }

        for (name, value) in scope.options.iter() {
            tags.insert(format!("{OPTION_TAG_PREFIX}{name}"), value.clone());
        }
        tags
    }

    /// Builds the full report for a failure.
    pub fn report(scope: &FailureScope<'_>, error: &TaskError) -> ErrorReport {
        ErrorReport {
            task: scope.task.to_string(),
            label: error.as_label().to_string(),
            message: error.to_string(),
            tags: Self::tags(scope),
        }
    }
}

impl LifecycleHook for ErrorReporting {
    fn on_init(&self, scope: &InitScope<'_>) -> Result<(), TaskError> {
        scope
            .project
            .init_error_reporting()
            .map_err(|e| TaskError::fatal(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "error_reporting"
    }
}

#[async_trait]
impl FailureObserver for ErrorReporting {
    async fn on_failure(
        &self,
        scope: &FailureScope<'_>,
        error: &TaskError,
    ) -> Result<Option<EventHandle>, ReportError> {
        if !scope.project.error_reporting_enabled() {
            return Ok(None);
        }
        info!(task = scope.task, "sending error report");

        let report = Self::report(scope, error);
        let handle = scope.project.report_error(&report).await?;
        Ok(Some(handle))
    }

    fn name(&self) -> &'static str {
        "error_reporting"
    }
}
