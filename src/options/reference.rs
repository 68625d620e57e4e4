//! # Indirection references (`$<source>.<path>`).
//!
//! Resolution is two-branch: the lookup either succeeds and yields a new value, or
//! it fails for any reason and the raw value is kept. Failures are never reported.

use serde_json::Value;

use crate::context::Contexts;

/// A parsed `$<source>.<path>` reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reference<'a> {
    /// Name of the attribute source.
    pub source: &'a str,
    /// Dotted attribute path within the source.
    pub path: &'a str,
}

impl<'a> Reference<'a> {
    /// Parses `raw` as a reference. Both the source name and the path must be non-empty.
    ///
    /// # Example
    /// ```
    /// use taskctl::Reference;
    ///
    /// let r = Reference::parse("$project_config.repo.name").unwrap();
    /// assert_eq!((r.source, r.path), ("project_config", "repo.name"));
    /// assert!(Reference::parse("project_config.repo").is_none());
    /// assert!(Reference::parse("$project_config").is_none());
    /// ```
    pub fn parse(raw: &'a str) -> Option<Self> {
        let (source, path) = raw.strip_prefix('$')?.split_once('.')?;
        if source.is_empty() || path.is_empty() {
            return None;
        }
        Some(Self { source, path })
    }

    /// Reads the referenced attribute. `None` if the source or attribute is missing.
    pub fn lookup(&self, contexts: &Contexts) -> Option<Value> {
        contexts.get(self.source)?.get_attribute(self.path)
    }
}

/// Attempts to resolve `value` as a reference.
///
/// Returns `Some(resolved)` only for a string reference whose lookup succeeded.
/// Non-strings, non-reference strings and failed lookups return `None`.
pub fn try_resolve(value: &Value, contexts: &Contexts) -> Option<Value> {
    let raw = value.as_str()?;
    Reference::parse(raw)?.lookup(contexts)
}

/// Resolves `value`, falling back to the original literal on any lookup failure.
pub fn resolve_or_keep(value: Value, contexts: &Contexts) -> Value {
    match try_resolve(&value, contexts) {
        Some(resolved) => resolved,
        None => value,
    }
}
