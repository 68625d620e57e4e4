//! # Declared option schema of a task type.
//!
//! A [`TaskDefinition`] is an ordered list of [`OptionSpec`]s. The order is the
//! declaration order and is the order in which missing options are reported.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::options::OptionMap;

/// One recognized option: name, whether it must be supplied, and its documentation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionSpec {
    /// Option name as it appears in task config and overrides.
    pub name: String,
    /// `true` if construction must fail when the option is absent.
    #[serde(default)]
    pub required: bool,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Documented default value.
    ///
    /// It is informational only: the resolver never injects it, and a required
    /// option with a default is still missing when no value is supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl OptionSpec {
    /// A required option.
    pub fn required(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: true,
            description: description.into(),
            default: None,
        }
    }

    /// An optional option.
    pub fn optional(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            description: description.into(),
            default: None,
        }
    }

    /// Returns the spec with a documented default.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// Ordered option schema owned by a task type.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskDefinition {
    options: Vec<OptionSpec>,
}

impl TaskDefinition {
    /// Empty definition (no recognized options).
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an option. Re-declaring a name replaces the earlier spec in place.
    pub fn with_option(mut self, spec: OptionSpec) -> Self {
        match self.options.iter_mut().find(|o| o.name == spec.name) {
            Some(slot) => *slot = spec,
            None => self.options.push(spec),
        }
        self
    }

    /// Looks up an option spec by name.
    pub fn get(&self, name: &str) -> Option<&OptionSpec> {
        self.options.iter().find(|o| o.name == name)
    }

    /// Iterates specs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &OptionSpec> {
        self.options.iter()
    }

    /// Number of declared options.
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// True if no options are declared.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Names of required options absent from `resolved`, in declaration order.
    pub fn missing_required(&self, resolved: &OptionMap) -> Vec<String> {
        self.options
            .iter()
            .filter(|o| o.required && !resolved.contains_key(&o.name))
            .map(|o| o.name.clone())
            .collect()
    }
}

impl FromIterator<OptionSpec> for TaskDefinition {
    fn from_iter<I: IntoIterator<Item = OptionSpec>>(iter: I) -> Self {
        iter.into_iter()
            .fold(TaskDefinition::new(), TaskDefinition::with_option)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_redeclaring_replaces_in_place() {
        let def = TaskDefinition::new()
            .with_option(OptionSpec::optional("a", "first"))
            .with_option(OptionSpec::optional("b", "second"))
            .with_option(OptionSpec::required("a", "first, now required"));

        let names: Vec<_> = def.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert!(def.get("a").is_some_and(|o| o.required));
    }

    #[test]
    fn test_missing_required_keeps_declaration_order() {
        let def: TaskDefinition = [
            OptionSpec::required("zeta", ""),
            OptionSpec::optional("beta", ""),
            OptionSpec::required("alpha", ""),
        ]
        .into_iter()
        .collect();

        let resolved = OptionMap::new();
        assert_eq!(def.missing_required(&resolved), ["zeta", "alpha"]);
    }

    #[test]
    fn test_default_does_not_satisfy_required() {
        let def = TaskDefinition::new()
            .with_option(OptionSpec::required("path", "target").with_default("src"));
        assert_eq!(def.missing_required(&OptionMap::new()), ["path"]);
    }

    #[test]
    fn test_deserializes_from_list() {
        let def: TaskDefinition = serde_json::from_value(json!([
            { "name": "path", "required": true, "description": "target dir" },
            { "name": "dry_run", "default": false }
        ]))
        .unwrap();

        assert_eq!(def.len(), 2);
        assert_eq!(def.get("dry_run").and_then(|o| o.default.clone()), Some(json!(false)));
    }
}
