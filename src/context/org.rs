use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::AttributeSource;
use crate::options::OptionMap;

/// Identity of the target environment (the "org") a task acts against.
///
/// Controllers only read it; one org is typically shared by every step of a flow.
pub trait OrgContext: AttributeSource {
    /// Login name used against the org.
    fn username(&self) -> Option<&str>;

    /// Stable org identifier.
    fn org_id(&self) -> Option<&str>;

    /// True for ephemeral (scratch) environments.
    fn is_scratch(&self) -> bool;
}

/// Plain-data org identity.
///
/// Extra keys are kept and exposed as attributes, so `"$org_config.instance_url"`
/// resolves when the config carries an `instance_url` field.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OrgConfig {
    /// Login name, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Org identifier, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
    /// True for scratch (ephemeral) orgs.
    #[serde(default)]
    pub scratch: bool,
    /// Any other keys, exposed as attributes.
    #[serde(flatten)]
    pub extra: OptionMap,
}

impl OrgConfig {
    /// Persistent org with the given username and id.
    pub fn new(username: impl Into<String>, org_id: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            org_id: Some(org_id.into()),
            ..Self::default()
        }
    }

    /// Marks the org as scratch.
    pub fn scratch(mut self) -> Self {
        self.scratch = true;
        self
    }
}

impl AttributeSource for OrgConfig {
    fn get_attribute(&self, path: &str) -> Option<Value> {
        match path {
            "username" => self.username.clone().map(Value::String),
            "org_id" => self.org_id.clone().map(Value::String),
            "scratch" => Some(Value::Bool(self.scratch)),
            _ => self.extra.get_attribute(path),
        }
    }
}

impl OrgContext for OrgConfig {
    fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    fn org_id(&self) -> Option<&str> {
        self.org_id.as_deref()
    }

    fn is_scratch(&self) -> bool {
        self.scratch
    }
}
