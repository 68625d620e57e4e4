//! # Option interpretation strategies.
//!
//! Exactly one [`OptionHandler`] is active per task type. It replaces the whole
//! validation step; handlers never compose.
//!
//! - [`RequiredOptions`] (default): every `required` option of the definition must be set.
//! - [`SchemaOptions<T>`]: the resolved options must deserialize into `T`.

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::OptionsError;
use crate::options::{OptionSet, TaskDefinition};

/// Validates resolved options for a task type.
pub trait OptionHandler: Send + Sync + 'static {
    /// Accepts or rejects `options`.
    fn validate(
        &self,
        task: &str,
        definition: &TaskDefinition,
        options: &OptionSet,
    ) -> Result<(), OptionsError>;

    /// Handler name used in logs and conflict errors.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Plain required/optional model driven by the [`TaskDefinition`].
#[derive(Clone, Copy, Debug, Default)]
pub struct RequiredOptions;

impl OptionHandler for RequiredOptions {
    fn validate(
        &self,
        task: &str,
        definition: &TaskDefinition,
        options: &OptionSet,
    ) -> Result<(), OptionsError> {
        options.validate(task, definition)
    }

    fn name(&self) -> &'static str {
        "required"
    }
}

/// Schema-driven validation: the options object must deserialize into `T`.
///
/// The definition's `required` flags are ignored; `T` is the schema.
///
/// # Example
/// ```
/// use serde::Deserialize;
/// use taskctl::{OptionHandler, OptionSet, SchemaOptions, TaskDefinition};
///
/// #[derive(Deserialize)]
/// struct Deploy { path: String, #[serde(default)] dry_run: bool }
///
/// let options = OptionSet::from(serde_json::json!({ "path": "src" }).as_object().unwrap().clone());
/// let handler = SchemaOptions::<Deploy>::new();
/// assert!(handler.validate("Deploy", &TaskDefinition::new(), &options).is_ok());
/// ```
pub struct SchemaOptions<T> {
    _schema: PhantomData<fn() -> T>,
}

impl<T> SchemaOptions<T> {
    pub fn new() -> Self {
        Self {
            _schema: PhantomData,
        }
    }
}

impl<T> Default for SchemaOptions<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for SchemaOptions<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SchemaOptions<{}>", std::any::type_name::<T>())
    }
}

impl<T> SchemaOptions<T>
where
    T: DeserializeOwned,
{
    /// Deserializes `options` into the schema type.
    pub fn parse(&self, task: &str, options: &OptionSet) -> Result<T, OptionsError> {
        serde_json::from_value(Value::Object(options.as_map().clone())).map_err(|e| {
            OptionsError::Invalid {
                task: task.to_string(),
                reason: e.to_string(),
            }
        })
    }
}

impl<T> OptionHandler for SchemaOptions<T>
where
    T: DeserializeOwned + 'static,
{
    fn validate(
        &self,
        task: &str,
        _definition: &TaskDefinition,
        options: &OptionSet,
    ) -> Result<(), OptionsError> {
        self.parse(task, options).map(|_| ())
    }

    fn name(&self) -> &'static str {
        "schema"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{OptionMap, OptionSpec};
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Retrieve {
        package: String,
        #[serde(default)]
        api_version: Option<String>,
    }

    fn set(value: Value) -> OptionSet {
        OptionSet::from(value.as_object().cloned().unwrap_or_else(OptionMap::new))
    }

    #[test]
    fn test_required_handler_reports_missing() {
        let def = TaskDefinition::new().with_option(OptionSpec::required("path", ""));
        let err = RequiredOptions
            .validate("Deploy", &def, &set(json!({})))
            .unwrap_err();
        assert_eq!(err.missing(), ["path".to_string()]);
    }

    #[test]
    fn test_schema_accepts_matching_options() {
        let handler = SchemaOptions::<Retrieve>::new();
        let parsed = handler
            .parse("Retrieve", &set(json!({ "package": "core", "api_version": "59.0" })))
            .unwrap();
        assert_eq!(parsed.package, "core");
        assert_eq!(parsed.api_version.as_deref(), Some("59.0"));
    }

    #[test]
    fn test_schema_rejects_with_invalid_error() {
        let handler = SchemaOptions::<Retrieve>::new();
        let err = handler
            .validate("Retrieve", &TaskDefinition::new(), &set(json!({ "package": 5 })))
            .unwrap_err();
        assert!(matches!(err, OptionsError::Invalid { .. }));
        assert_eq!(err.as_label(), "options_invalid");
    }

    #[test]
    fn test_schema_replaces_required_check() {
        // `path` is required by the definition, but the schema does not need it.
        let def = TaskDefinition::new().with_option(OptionSpec::required("path", ""));
        let handler = SchemaOptions::<Retrieve>::new();
        assert!(handler
            .validate("Retrieve", &def, &set(json!({ "package": "core" })))
            .is_ok());
    }
}
