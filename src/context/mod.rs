//! # External collaborators of a controller.
//!
//! - [`AttributeSource`] / [`Contexts`] - named sources for option indirection
//! - [`ProjectContext`] / [`ProjectConfig`] - attributes plus error reporting
//! - [`OrgContext`] / [`OrgConfig`] - identity of the target environment
//!
//! Contexts are shared read-only (`Arc`) across controllers.

mod attribute;
mod org;
mod project;

pub use attribute::{AttributeSource, Contexts, walk_path};
pub use org::{OrgConfig, OrgContext};
pub use project::{
    ErrorReport, ErrorReporter, ErrorTags, EventHandle, LogReporter, ProjectConfig,
    ProjectContext,
};
