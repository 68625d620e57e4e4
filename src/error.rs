//! Error types used by the task controller and task actions.
//!
//! This module defines the error enums of the crate:
//!
//! - [`BuildError`] - construction failed; no controller was produced.
//! - [`OptionsError`] - resolved options were rejected by the option handler.
//! - [`TaskError`] - failures raised by a task action (or a misuse of `run`).
//! - [`ReportError`] - failures of the external error-reporting backend.
//! - [`ChainError`] - a task type declared incompatible capabilities.
//!
//! All of them provide `as_label` (a stable snake_case label for logs and report tags).

use thiserror::Error;

use crate::controller::Lifecycle;

/// # Errors produced while constructing a [`TaskController`](crate::TaskController).
///
/// Construction is all-or-nothing: any of these aborts it and no instance is returned.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum BuildError {
    /// The task type requires an org (identity) context but none was supplied.
    #[error("{task} requires an org context but none was passed to the controller")]
    MissingCredentials {
        /// Task type name.
        task: String,
    },

    /// Options were missing or rejected by the option handler.
    #[error(transparent)]
    Options(#[from] OptionsError),

    /// A construction hook (capability init, credential refresh, task init) failed.
    #[error("{task}: {stage} failed: {error}")]
    Hook {
        /// Task type name.
        task: String,
        /// Construction stage that failed.
        stage: &'static str,
        /// The underlying error message.
        error: String,
    },
}

impl BuildError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use taskctl::BuildError;
    ///
    /// let err = BuildError::MissingCredentials { task: "deploy".into() };
    /// assert_eq!(err.as_label(), "build_missing_credentials");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            BuildError::MissingCredentials { .. } => "build_missing_credentials",
            BuildError::Options(e) => e.as_label(),
            BuildError::Hook { .. } => "build_hook_failed",
        }
    }
}

/// # Errors produced by option validation.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptionsError {
    /// One or more required options are absent. Names are listed in declaration order.
    #[error("{task} requires the options ({}) and no values were provided", names.join(", "))]
    Missing {
        /// Task type name.
        task: String,
        /// Every missing required option, in declaration order.
        names: Vec<String>,
    },

    /// A schema option handler rejected the resolved options.
    #[error("{task} options are invalid: {reason}")]
    Invalid {
        /// Task type name.
        task: String,
        /// Rejection reason reported by the schema.
        reason: String,
    },
}

impl OptionsError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            OptionsError::Missing { .. } => "options_missing",
            OptionsError::Invalid { .. } => "options_invalid",
        }
    }

    /// Names of the missing options (empty for [`OptionsError::Invalid`]).
    pub fn missing(&self) -> &[String] {
        match self {
            OptionsError::Missing { names, .. } => names,
            OptionsError::Invalid { .. } => &[],
        }
    }
}

/// # Errors produced by task execution.
///
/// `Fail` is retryable (when a retry capability is installed), `Fatal` never is.
/// `NotReady` means the action was not invoked at all.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// Non-recoverable fatal error (should not be retried).
    #[error("fatal error (no retry): {error}")]
    Fatal {
        /// The underlying error message.
        error: String,
    },

    /// Task execution failed but may succeed if retried.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// `run` was called on a controller that already ran.
    #[error("task is not ready to run (state: {state})")]
    NotReady {
        /// Lifecycle state at the time of the call.
        state: Lifecycle,
    },
}

impl TaskError {
    /// Shorthand for [`TaskError::Fail`].
    pub fn fail(error: impl Into<String>) -> Self {
        TaskError::Fail {
            error: error.into(),
        }
    }

    /// Shorthand for [`TaskError::Fatal`].
    pub fn fatal(error: impl Into<String>) -> Self {
        TaskError::Fatal {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use taskctl::TaskError;
    ///
    /// let err = TaskError::fail("boom");
    /// assert_eq!(err.as_label(), "task_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fatal { .. } => "task_fatal",
            TaskError::Fail { .. } => "task_failed",
            TaskError::NotReady { .. } => "task_not_ready",
        }
    }

    /// Indicates whether the error type is safe to retry.
    ///
    /// # Example
    /// ```
    /// use taskctl::TaskError;
    ///
    /// assert!(TaskError::fail("boom").is_retryable());
    /// assert!(!TaskError::fatal("nope").is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        matches!(self, TaskError::Fail { .. })
    }
}

/// # Errors produced by an error-reporting backend.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    /// Reporting is enabled but no reporter was injected.
    #[error("error reporting is enabled but no reporter is configured")]
    NotConfigured,

    /// The backend rejected or failed to deliver the report.
    #[error("report delivery failed: {0}")]
    Delivery(String),
}

impl ReportError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ReportError::NotConfigured => "report_not_configured",
            ReportError::Delivery(_) => "report_delivery_failed",
        }
    }
}

/// # Errors produced while declaring a task type's capabilities.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    /// Two option handlers were declared; only one may interpret options.
    #[error("option handler '{second}' conflicts with already declared '{first}'")]
    ConflictingOptionHandlers {
        /// Handler declared first.
        first: &'static str,
        /// Handler declared second.
        second: &'static str,
    },

    /// Two retry strategies were declared; only one may wrap the action.
    #[error("a retry strategy is already declared for this task type")]
    ConflictingRetry,
}

impl ChainError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ChainError::ConflictingOptionHandlers { .. } => "chain_conflicting_options",
            ChainError::ConflictingRetry => "chain_conflicting_retry",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_options_message_names_all() {
        let err = OptionsError::Missing {
            task: "Deploy".into(),
            names: vec!["a".into(), "b".into()],
        };
        assert_eq!(
            err.to_string(),
            "Deploy requires the options (a, b) and no values were provided"
        );
        assert_eq!(err.missing(), ["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_build_error_wraps_options_transparently() {
        let inner = OptionsError::Invalid {
            task: "Deploy".into(),
            reason: "bad".into(),
        };
        let err = BuildError::from(inner.clone());
        assert_eq!(err.to_string(), inner.to_string());
        assert_eq!(err.as_label(), "options_invalid");
    }

    #[test]
    fn test_not_ready_is_not_retryable() {
        let err = TaskError::NotReady {
            state: Lifecycle::Completed,
        };
        assert!(!err.is_retryable());
        assert_eq!(err.to_string(), "task is not ready to run (state: completed)");
    }
}
