//! # Project-level context and error reporting.
//!
//! The project context is the only way a controller reaches the outside world:
//! attribute lookups for indirection and, when enabled, external error reporting.
//!
//! ```text
//! ErrorReporting capability ──► ProjectContext::report_error(&ErrorReport)
//!                                   └─► ErrorReporter::capture ──► EventHandle
//!                                        (ProjectConfig keeps the last handle)
//! ```
//!
//! The reporter is injected into the project context; controllers only hold a
//! shared reference to it.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error};
use uuid::Uuid;

use crate::context::{AttributeSource, walk_path};
use crate::error::ReportError;

/// Acknowledgement returned by a reporting backend (e.g. an event id).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventHandle(String);

impl EventHandle {
    /// Wraps a backend event id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The backend event id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tags attached to an error report, keyed by tag name.
pub type ErrorTags = BTreeMap<String, Value>;

/// A failure ready to be sent to a reporting backend.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ErrorReport {
    /// Task type name.
    pub task: String,
    /// Stable error label (see [`TaskError::as_label`](crate::TaskError::as_label)).
    pub label: String,
    /// Original error message, verbatim.
    pub message: String,
    /// Context tags.
    pub tags: ErrorTags,
}

/// External error-reporting client.
#[async_trait]
pub trait ErrorReporter: Send + Sync + 'static {
    /// Delivers one report and returns the backend's handle for it.
    async fn capture(&self, report: &ErrorReport) -> Result<EventHandle, ReportError>;

    /// Reporter name used in logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Reporter that writes reports to the `tracing` pipeline and mints UUID handles.
#[derive(Debug, Default)]
pub struct LogReporter;

#[async_trait]
impl ErrorReporter for LogReporter {
    async fn capture(&self, report: &ErrorReport) -> Result<EventHandle, ReportError> {
        let handle = EventHandle::new(Uuid::new_v4().to_string());
        error!(
            event = %handle,
            task = %report.task,
            label = %report.label,
            tags = ?report.tags,
            "{}",
            report.message
        );
        Ok(handle)
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

/// Project-wide collaborator consumed by controllers.
#[async_trait]
pub trait ProjectContext: AttributeSource + 'static {
    /// True if failures should be sent to the external reporter.
    fn error_reporting_enabled(&self) -> bool {
        false
    }

    /// Prepares the reporting session. Called by the reporting capability during construction.
    fn init_error_reporting(&self) -> Result<(), ReportError> {
        Ok(())
    }

    /// Sends a report.
    async fn report_error(&self, _report: &ErrorReport) -> Result<EventHandle, ReportError> {
        Err(ReportError::NotConfigured)
    }
}

/// Attribute tree plus an optional injected reporter.
pub struct ProjectConfig {
    attributes: Value,
    reporting: bool,
    reporter: Option<Arc<dyn ErrorReporter>>,
    session: AtomicBool,
    last_event: Mutex<Option<EventHandle>>,
}

impl ProjectConfig {
    /// Project with the given attribute tree and reporting disabled.
    pub fn new(attributes: Value) -> Self {
        Self {
            attributes,
            reporting: false,
            reporter: None,
            session: AtomicBool::new(false),
            last_event: Mutex::new(None),
        }
    }

    /// Injects a reporter and enables reporting.
    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = Some(reporter);
        self.reporting = true;
        self
    }

    /// Toggles reporting without touching the reporter.
    pub fn with_reporting(mut self, enabled: bool) -> Self {
        self.reporting = enabled;
        self
    }

    /// True once [`ProjectContext::init_error_reporting`] has succeeded.
    pub fn reporting_initialized(&self) -> bool {
        self.session.load(Ordering::Acquire)
    }

    /// Handle of the most recent delivered report.
    pub fn last_event(&self) -> Option<EventHandle> {
        self.last_event
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self::new(Value::Object(Default::default()))
    }
}

impl fmt::Debug for ProjectConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectConfig")
            .field("attributes", &self.attributes)
            .field("reporting", &self.reporting)
            .field("reporter", &self.reporter.as_ref().map(|r| r.name()))
            .finish()
    }
}

impl AttributeSource for ProjectConfig {
    fn get_attribute(&self, path: &str) -> Option<Value> {
        walk_path(&self.attributes, path).cloned()
    }
}

#[async_trait]
impl ProjectContext for ProjectConfig {
    fn error_reporting_enabled(&self) -> bool {
        self.reporting
    }

    fn init_error_reporting(&self) -> Result<(), ReportError> {
        if !self.reporting {
            return Ok(());
        }
        let reporter = self.reporter.as_ref().ok_or(ReportError::NotConfigured)?;
        if !self.session.swap(true, Ordering::AcqRel) {
            debug!(reporter = reporter.name(), "error reporting initialized");
        }
        Ok(())
    }

    async fn report_error(&self, report: &ErrorReport) -> Result<EventHandle, ReportError> {
        let reporter = self.reporter.as_ref().ok_or(ReportError::NotConfigured)?;
        let handle = reporter.capture(report).await?;
        *self
            .last_event
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(handle.clone());
        Ok(handle)
    }
}
