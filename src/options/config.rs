use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::options::OptionMap;

/// Raw configuration for one task invocation.
///
/// Option values are literals or indirection references (`"$project_config.repo_name"`).
/// How this is loaded from disk is the caller's business; any serde format works.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Free-form description shown to operators.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Grouping label (e.g. "Deployment", "Testing").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Raw option values.
    #[serde(default)]
    pub options: OptionMap,
}

impl TaskConfig {
    /// Config holding only the given options.
    pub fn with_options(options: OptionMap) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Returns the config with one more option set.
    pub fn option(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_options_default_to_empty() {
        let cfg: TaskConfig = serde_json::from_value(json!({ "description": "deploy" })).unwrap();
        assert!(cfg.options.is_empty());
        assert_eq!(cfg.description.as_deref(), Some("deploy"));
    }

    #[test]
    fn test_builder_sets_options() {
        let cfg = TaskConfig::default().option("path", "src").option("retries", 3);
        assert_eq!(cfg.options.get("path"), Some(&json!("src")));
        assert_eq!(cfg.options.get("retries"), Some(&json!(3)));
    }
}
