use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::capabilities::{PollPolicy, Poller};
use crate::context::{OrgContext, ProjectContext};
use crate::options::OptionSet;

/// Read-only view of a controller handed to the action.
///
/// Cheap to clone: everything is shared behind `Arc`. The only per-call value is
/// the attempt number set by the retry strategy.
#[derive(Clone)]
pub struct TaskContext {
    name: Arc<str>,
    options: Arc<OptionSet>,
    project: Arc<dyn ProjectContext>,
    org: Option<Arc<dyn OrgContext>>,
    flow: Option<Arc<str>>,
    poll: PollPolicy,
    attempt: u32,
}

impl TaskContext {
    pub(crate) fn new(
        name: &str,
        options: OptionSet,
        project: Arc<dyn ProjectContext>,
        org: Option<Arc<dyn OrgContext>>,
        flow: Option<&str>,
        poll: PollPolicy,
    ) -> Self {
        Self {
            name: Arc::from(name),
            options: Arc::new(options),
            project,
            org,
            flow: flow.map(Arc::from),
            poll,
            attempt: 1,
        }
    }

    /// Task type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolved options.
    pub fn options(&self) -> &OptionSet {
        &self.options
    }

    /// Shorthand for `options().get(name)`.
    pub fn option(&self, name: &str) -> Option<&Value> {
        self.options.get(name)
    }

    pub fn project(&self) -> &dyn ProjectContext {
        self.project.as_ref()
    }

    pub fn org(&self) -> Option<&dyn OrgContext> {
        self.org.as_deref()
    }

    /// Name of the enclosing flow step, if the task runs inside a flow.
    pub fn flow(&self) -> Option<&str> {
        self.flow.as_deref()
    }

    /// 1-based attempt number of the current invocation.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Fresh poller using the task type's poll policy.
    pub fn poller(&self) -> Poller {
        Poller::new(self.poll)
    }

    /// Copy of this context for the given attempt.
    pub fn with_attempt(&self, attempt: u32) -> Self {
        Self {
            attempt,
            ..self.clone()
        }
    }
}

impl fmt::Debug for TaskContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskContext")
            .field("name", &self.name)
            .field("options", &self.options)
            .field("has_org", &self.org.is_some())
            .field("flow", &self.flow)
            .field("attempt", &self.attempt)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{OrgConfig, ProjectConfig};
    use crate::options::OptionMap;
    use serde_json::json;

    #[test]
    fn test_with_attempt_keeps_shared_state() {
        let mut map = OptionMap::new();
        map.insert("path".into(), json!("src"));
        let ctx = TaskContext::new(
            "Deploy",
            OptionSet::from(map),
            Arc::new(ProjectConfig::default()),
            Some(Arc::new(OrgConfig::new("dev@example.com", "00D1"))),
            None,
            PollPolicy::default(),
        );

        let second = ctx.with_attempt(2);
        assert_eq!(ctx.attempt(), 1);
        assert_eq!(second.attempt(), 2);
        assert_eq!(second.option("path"), Some(&json!("src")));
        assert_eq!(second.org().and_then(|o| o.username()), Some("dev@example.com"));
        assert!(Arc::ptr_eq(&ctx.options, &second.options));
    }
}
