//! # Option schema, raw config and resolved option values.
//!
//! - [`TaskDefinition`] / [`OptionSpec`] - the options a task type recognizes
//! - [`TaskConfig`] - raw values for one invocation
//! - [`OptionSet`] - merged and resolved values
//! - [`Reference`] - `$<source>.<path>` indirection

mod config;
mod definition;
mod reference;
mod set;

pub use config::TaskConfig;
pub use definition::{OptionSpec, TaskDefinition};
pub use reference::{Reference, resolve_or_keep, try_resolve};
pub use set::OptionSet;

/// Option name → value map used for raw config, overrides and return values.
pub type OptionMap = serde_json::Map<String, serde_json::Value>;
