//! # taskctl
//!
//! **taskctl** is a task execution controller for Rust.
//!
//! A task is one unit of orchestrated work built from declarative configuration. The
//! controller resolves and validates its options, runs the user-defined action once,
//! and passes any failure through a uniform interception point before returning it.
//! What the action does (deploying metadata, running a script, ...) is up to the user.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  ┌────────────────────┐  ┌────────────────────┐  ┌─────────────────────────┐
//!  │      TaskType      │  │     TaskConfig     │  │ ProjectContext / Org    │
//!  │ name, definition,  │  │ raw options with   │  │ (shared, Arc)           │
//!  │ CapabilityChain    │  │ $source.path refs  │  │ attributes, reporting   │
//!  └─────────┬──────────┘  └─────────┬──────────┘  └────────────┬────────────┘
//!            └───────────────────────┼──────────────────────────┘
//!                                    ▼
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ControllerBuilder::build(task)                                         │
//! │  1. org check  2. span  3. init hooks  4. resolve  5. validate          │
//! │  6. update_credentials  7. init_task                                    │
//! └───────────────────────────────────┬─────────────────────────────────────┘
//!                                     ▼
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  TaskController (Ready)                                                 │
//! │  run() ──► CapabilityChain::invoke ──► [RetryStrategy] ──► Task::run_task│
//! │        └─► on Err: ErrorInterceptor ──► FailureObserver(s)              │
//! │                                         (e.g. ErrorReporting)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ### Lifecycle
//! ```text
//! Created ─► Initializing ─► Validated ─► Ready ─► Executing ─► Completed
//!                                                            └─► Failed
//! ```
//! Each controller is single-use; a second `run` returns [`TaskError::NotReady`].
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                                  |
//! |-------------------|---------------------------------------------------------------|-----------------------------------------------------|
//! | **Options**       | Declared options, raw config, merge + indirection resolution  | [`TaskDefinition`], [`TaskConfig`], [`OptionSet`]   |
//! | **Capabilities**  | Option handlers, hooks, failure observers, retry              | [`CapabilityChain`], [`IntoCapabilities`]           |
//! | **Controller**    | Ordered construction and single execution                     | [`TaskController`], [`ControllerBuilder`]           |
//! | **Reporting**     | Failure tags sent through the project's reporter              | [`ErrorReporting`], [`ErrorReporter`]               |
//! | **Policies**      | Retry backoff and poll interval growth                        | [`BackoffPolicy`], [`RetryPolicy`], [`PollPolicy`]  |
//! | **Errors**        | Typed construction and execution errors                       | [`BuildError`], [`TaskError`]                       |
//!
//! ## Optional features
//! - `logger` (default): exposes [`logger_init`] to install a `tracing-subscriber` registry.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use taskctl::{
//!     ErrorReporting, OptionSpec, ProjectConfig, RetryPolicy, TaskConfig, TaskContext,
//!     TaskController, TaskError, TaskFn, TaskOutput, TaskType,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let deploy = TaskType::builder("Deploy")
//!         .option(OptionSpec::required("path", "Directory to deploy"))
//!         .capability(ErrorReporting)
//!         .capability(RetryPolicy::new(3))
//!         .build()?;
//!
//!     let project = Arc::new(ProjectConfig::new(serde_json::json!({ "repo": { "src": "force-app" } })));
//!     let config = TaskConfig::default().option("path", "$project_config.repo.src");
//!
//!     let action = TaskFn::new(|ctx: TaskContext| async move {
//!         let path = ctx.options().get_str("path").unwrap_or_default().to_string();
//!         Ok::<_, TaskError>(TaskOutput::new().with_return("deployed", path))
//!     });
//!
//!     let mut controller = TaskController::builder(deploy, config, project).build(action)?;
//!     let values = controller.run().await?;
//!     assert_eq!(values["deployed"], "force-app");
//!     Ok(())
//! }
//! ```
mod capabilities;
mod context;
mod controller;
mod error;
mod options;
mod policies;
mod tasks;

// ---- Public re-exports ----

pub use capabilities::{
    Capability, CapabilityChain, ErrorReporting, FailureObserver, FailureScope, HookFn,
    InitScope, IntoCapabilities, LifecycleHook, OPTION_TAG_PREFIX, OptionHandler, PollPolicy,
    PollStatus, Poller, RequiredOptions, RetryPolicy, RetryStrategy, SchemaOptions,
};
pub use context::{
    AttributeSource, Contexts, ErrorReport, ErrorReporter, ErrorTags, EventHandle, LogReporter,
    OrgConfig, OrgContext, ProjectConfig, ProjectContext, walk_path,
};
pub use controller::{
    ControllerBuilder, ErrorInterceptor, Lifecycle, ORG_CONTEXT, PROJECT_CONTEXT, TaskController,
};
pub use error::{BuildError, ChainError, OptionsError, ReportError, TaskError};
pub use options::{
    OptionMap, OptionSet, OptionSpec, Reference, TaskConfig, TaskDefinition, resolve_or_keep,
    try_resolve,
};
pub use policies::{BackoffPolicy, JitterPolicy};
pub use tasks::{Noop, Task, TaskContext, TaskFn, TaskOutput, TaskType, TaskTypeBuilder};

// Optional: `tracing-subscriber` setup for binaries and demos.
// Enable with: `--features logger` (on by default)
#[cfg(feature = "logger")]
mod logger;
#[cfg(feature = "logger")]
pub use logger::{LoggerConfig, LoggerError, LoggerFormat, logger_init};
