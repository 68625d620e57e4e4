//! # Named attribute sources used by option indirection.
//!
//! An option value `"$<source>.<path>"` is resolved by asking the source registered
//! under `<source>` in [`Contexts`] for `<path>`. Paths are dotted; each segment is an
//! object key or an array index.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Read-only attribute lookup.
///
/// Returning `None` means "no such attribute"; the caller keeps the raw option value.
/// Returning `Some(Value::Null)` is a successful lookup of a null attribute.
pub trait AttributeSource: Send + Sync {
    /// Reads the attribute at a dotted `path`.
    fn get_attribute(&self, path: &str) -> Option<Value>;
}

impl<T: AttributeSource + ?Sized> AttributeSource for Arc<T> {
    fn get_attribute(&self, path: &str) -> Option<Value> {
        (**self).get_attribute(path)
    }
}

impl AttributeSource for Value {
    fn get_attribute(&self, path: &str) -> Option<Value> {
        walk_path(self, path).cloned()
    }
}

impl AttributeSource for serde_json::Map<String, Value> {
    fn get_attribute(&self, path: &str) -> Option<Value> {
        let (head, rest) = match path.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };
        let root = self.get(head)?;
        match rest {
            Some(rest) => walk_path(root, rest).cloned(),
            None => Some(root.clone()),
        }
    }
}

/// Walks a dotted path through nested objects and arrays.
///
/// An empty path or an empty segment never matches.
pub fn walk_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    path.split('.').try_fold(root, |node, segment| {
        if segment.is_empty() {
            return None;
        }
        match node {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    })
}

/// Registry of attribute sources by name.
///
/// Shared read-only by every controller that receives it.
#[derive(Clone, Default)]
pub struct Contexts {
    sources: HashMap<String, Arc<dyn AttributeSource>>,
}

impl Contexts {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) a source under `name`.
    pub fn insert(&mut self, name: impl Into<String>, source: Arc<dyn AttributeSource>) {
        self.sources.insert(name.into(), source);
    }

    /// Returns the registry with one more source.
    pub fn with(mut self, name: impl Into<String>, source: Arc<dyn AttributeSource>) -> Self {
        self.insert(name, source);
        self
    }

    /// Looks up a source.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn AttributeSource>> {
        self.sources.get(name)
    }

    /// True if a source is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.sources.contains_key(name)
    }

    /// Number of registered sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl fmt::Debug for Contexts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.sources.keys().collect();
        names.sort();
        f.debug_struct("Contexts").field("sources", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_walk_nested_objects_and_arrays() {
        let root = json!({ "repo": { "branches": ["main", "dev"], "name": "core" } });
        assert_eq!(walk_path(&root, "repo.name"), Some(&json!("core")));
        assert_eq!(walk_path(&root, "repo.branches.1"), Some(&json!("dev")));
        assert_eq!(walk_path(&root, "repo.branches.7"), None);
        assert_eq!(walk_path(&root, "repo..name"), None);
        assert_eq!(walk_path(&root, ""), None);
    }

    #[test]
    fn test_null_attribute_is_found() {
        let root = json!({ "token": null });
        assert_eq!(root.get_attribute("token"), Some(Value::Null));
        assert_eq!(root.get_attribute("missing"), None);
    }

    #[test]
    fn test_map_source_reads_top_level_and_nested() {
        let mut map = serde_json::Map::new();
        map.insert("api".into(), json!({ "version": "59.0" }));
        assert_eq!(map.get_attribute("api.version"), Some(json!("59.0")));
        assert_eq!(map.get_attribute("api"), Some(json!({ "version": "59.0" })));
        assert_eq!(map.get_attribute("nope"), None);
    }

    #[test]
    fn test_registry_replaces_by_name() {
        let ctx = Contexts::new()
            .with("a", Arc::new(json!({ "x": 1 })))
            .with("a", Arc::new(json!({ "x": 2 })));
        assert_eq!(ctx.len(), 1);
        let source = ctx.get("a").unwrap();
        assert_eq!(source.get_attribute("x"), Some(json!(2)));
    }
}
