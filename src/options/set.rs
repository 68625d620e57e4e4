//! # Resolved option values of one task instance.
//!
//! ```text
//! TaskConfig.options ──► merge(overrides) ──► resolve_or_keep(each value) ──► OptionSet
//!                         (overrides win)      ($source.path lookups)
//! ```
//!
//! An [`OptionSet`] is built once during construction and never mutated afterwards.

use serde_json::Value;

use crate::context::Contexts;
use crate::error::OptionsError;
use crate::options::{OptionMap, TaskDefinition, reference::resolve_or_keep};

/// Effective option values for one task instance.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OptionSet {
    values: OptionMap,
}

impl OptionSet {
    /// Merges `config_options` and `overrides` (overrides win on collision), then
    /// resolves every indirection reference against `contexts`.
    ///
    /// Lookup failures are silent: the raw string stays in place.
    pub fn resolve(config_options: &OptionMap, overrides: &OptionMap, contexts: &Contexts) -> Self {
        let mut merged = config_options.clone();
        for (name, value) in overrides {
            merged.insert(name.clone(), value.clone());
        }

        let values = merged
            .into_iter()
            .map(|(name, value)| (name, resolve_or_keep(value, contexts)))
            .collect();
        Self { values }
    }

    /// Checks that every required option of `definition` is present.
    ///
    /// All missing names are reported together, in declaration order.
    pub fn validate(&self, task: &str, definition: &TaskDefinition) -> Result<(), OptionsError> {
        let names = definition.missing_required(&self.values);
        if names.is_empty() {
            return Ok(());
        }
        Err(OptionsError::Missing {
            task: task.to_string(),
            names,
        })
    }

    /// Value of an option, if set.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// String value of an option, if set and a string.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(Value::as_str)
    }

    /// True if the option is set (a null value counts as set).
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Iterates `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// Number of options.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if no option is set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Borrow the underlying map.
    pub fn as_map(&self) -> &OptionMap {
        &self.values
    }
}

impl From<OptionMap> for OptionSet {
    fn from(values: OptionMap) -> Self {
        Self { values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::OptionSpec;
    use serde_json::json;
    use std::sync::Arc;

    fn map(value: Value) -> OptionMap {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn test_overrides_take_precedence() {
        let set = OptionSet::resolve(&map(json!({ "x": 1 })), &map(json!({ "x": 2 })), &Contexts::new());
        assert_eq!(set.get("x"), Some(&json!(2)));
    }

    #[test]
    fn test_override_only_option_is_added() {
        let set = OptionSet::resolve(&OptionMap::new(), &map(json!({ "path": "/tmp" })), &Contexts::new());
        assert_eq!(set.as_map(), &map(json!({ "path": "/tmp" })));
    }

    #[test]
    fn test_references_resolved_after_merge() {
        let contexts = Contexts::new().with("ctx", Arc::new(json!({ "foo": 42 })));
        let set = OptionSet::resolve(
            &map(json!({ "a": "literal", "b": 3 })),
            &map(json!({ "a": "$ctx.foo", "c": "$ctx.missing", "d": [1, 2] })),
            &contexts,
        );
        assert_eq!(set.get("a"), Some(&json!(42)));
        assert_eq!(set.get("b"), Some(&json!(3)));
        assert_eq!(set.get_str("c"), Some("$ctx.missing"));
        assert_eq!(set.get("d"), Some(&json!([1, 2])));
    }

    #[test]
    fn test_validate_aggregates_missing() {
        let def = TaskDefinition::new()
            .with_option(OptionSpec::required("a", ""))
            .with_option(OptionSpec::required("b", ""))
            .with_option(OptionSpec::required("c", ""));
        let set = OptionSet::from(map(json!({ "b": null })));

        let err = set.validate("Demo", &def).unwrap_err();
        assert_eq!(err.missing(), ["a".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_validate_ignores_undeclared_options() {
        let def = TaskDefinition::new().with_option(OptionSpec::required("path", ""));
        let set = OptionSet::from(map(json!({ "path": "src", "extra": true })));
        assert!(set.validate("Demo", &def).is_ok());
    }
}
