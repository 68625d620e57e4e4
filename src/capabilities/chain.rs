//! # Ordered capability declaration of a task type.
//!
//! A [`CapabilityChain`] is built once per task type and shared by every controller
//! of that type. Each entry is one narrow behavior:
//!
//! ```text
//! Capability::Options   ─► replaces option validation     (at most one)
//! Capability::Hook      ─► runs during construction       (stackable, ordered)
//! Capability::Observer  ─► sees the final action failure  (stackable, ordered)
//! Capability::Retry     ─► wraps the action invocation    (at most one)
//! ```
//!
//! Conflicting declarations are rejected when the chain is built, not at run time.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::capabilities::hook::{HookFn, InitScope, LifecycleHook};
use crate::capabilities::observer::FailureObserver;
use crate::capabilities::options::{OptionHandler, RequiredOptions, SchemaOptions};
use crate::capabilities::reporting::ErrorReporting;
use crate::capabilities::retry::{RetryPolicy, RetryStrategy};
use crate::error::{BuildError, ChainError, OptionsError, TaskError};
use crate::options::{OptionSet, TaskDefinition};
use crate::tasks::{Task, TaskContext, TaskOutput};

/// One declared behavior.
#[derive(Clone)]
pub enum Capability {
    /// Option interpretation strategy.
    Options(Arc<dyn OptionHandler>),
    /// Construction-time hook.
    Hook(Arc<dyn LifecycleHook>),
    /// Failure observer.
    Observer(Arc<dyn FailureObserver>),
    /// Invocation wrapper.
    Retry(RetryStrategy),
}

impl Capability {
    /// Name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Capability::Options(h) => h.name(),
            Capability::Hook(h) => h.name(),
            Capability::Observer(o) => o.name(),
            Capability::Retry(_) => "retry",
        }
    }
}

impl std::fmt::Debug for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Capability::Options(_) => "Options",
            Capability::Hook(_) => "Hook",
            Capability::Observer(_) => "Observer",
            Capability::Retry(_) => "Retry",
        };
        write!(f, "{kind}({})", self.name())
    }
}

/// Anything that can be declared on a task type.
///
/// A single value may expand to several capabilities; [`ErrorReporting`] installs
/// both a hook and an observer.
pub trait IntoCapabilities {
    fn into_capabilities(self) -> Vec<Capability>;
}

impl IntoCapabilities for Capability {
    fn into_capabilities(self) -> Vec<Capability> {
        vec![self]
    }
}

impl IntoCapabilities for ErrorReporting {
    fn into_capabilities(self) -> Vec<Capability> {
        let shared = Arc::new(self);
        vec![
            Capability::Hook(shared.clone()),
            Capability::Observer(shared),
        ]
    }
}

impl IntoCapabilities for RetryPolicy {
    fn into_capabilities(self) -> Vec<Capability> {
        vec![Capability::Retry(RetryStrategy::Policy(self))]
    }
}

impl IntoCapabilities for RetryStrategy {
    fn into_capabilities(self) -> Vec<Capability> {
        vec![Capability::Retry(self)]
    }
}

impl IntoCapabilities for RequiredOptions {
    fn into_capabilities(self) -> Vec<Capability> {
        vec![Capability::Options(Arc::new(self))]
    }
}

impl<T> IntoCapabilities for SchemaOptions<T>
where
    T: DeserializeOwned + 'static,
{
    fn into_capabilities(self) -> Vec<Capability> {
        vec![Capability::Options(Arc::new(self))]
    }
}

impl<F> IntoCapabilities for HookFn<F>
where
    F: Fn(&InitScope<'_>) -> Result<(), TaskError> + Send + Sync + 'static,
{
    fn into_capabilities(self) -> Vec<Capability> {
        vec![Capability::Hook(Arc::new(self))]
    }
}

/// Ordered, validated set of capabilities.
#[derive(Clone, Debug, Default)]
pub struct CapabilityChain {
    entries: Vec<Capability>,
}

impl CapabilityChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a capability, rejecting a second option handler or retry strategy.
    pub fn push(&mut self, capability: Capability) -> Result<(), ChainError> {
        match &capability {
            Capability::Options(new) => {
                if let Some(first) = self.option_handler() {
                    return Err(ChainError::ConflictingOptionHandlers {
                        first: first.name(),
                        second: new.name(),
                    });
                }
            }
            Capability::Retry(_) if self.retry().is_some() => {
                return Err(ChainError::ConflictingRetry);
            }
            _ => {}
        }
        self.entries.push(capability);
        Ok(())
    }

    /// Runs every hook in declaration order. The first failure aborts.
    pub fn init_all(&self, scope: &InitScope<'_>) -> Result<(), BuildError> {
        for hook in self.hooks() {
            debug!(task = scope.task, hook = hook.name(), "running init hook");
            hook.on_init(scope).map_err(|e| BuildError::Hook {
                task: scope.task.to_string(),
                stage: hook.name(),
                error: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// Validates options with the declared handler, or [`RequiredOptions`] if none.
    pub fn validate(
        &self,
        task: &str,
        definition: &TaskDefinition,
        options: &OptionSet,
    ) -> Result<(), OptionsError> {
        match self.option_handler() {
            Some(handler) => handler.validate(task, definition, options),
            None => RequiredOptions.validate(task, definition, options),
        }
    }

    /// Invokes the action, through the retry strategy if one is declared.
    pub async fn invoke(
        &self,
        task: &mut dyn Task,
        ctx: &TaskContext,
    ) -> Result<TaskOutput, TaskError> {
        match self.retry() {
            Some(strategy) => strategy.run(task, ctx).await,
            None => task.run_task(ctx).await,
        }
    }

    /// Declared option handler, if any.
    pub fn option_handler(&self) -> Option<&Arc<dyn OptionHandler>> {
        self.entries.iter().find_map(|c| match c {
            Capability::Options(h) => Some(h),
            _ => None,
        })
    }

    /// Declared retry strategy, if any.
    pub fn retry(&self) -> Option<&RetryStrategy> {
        self.entries.iter().find_map(|c| match c {
            Capability::Retry(r) => Some(r),
            _ => None,
        })
    }

    /// Hooks in declaration order.
    pub fn hooks(&self) -> impl Iterator<Item = &Arc<dyn LifecycleHook>> {
        self.entries.iter().filter_map(|c| match c {
            Capability::Hook(h) => Some(h),
            _ => None,
        })
    }

    /// Failure observers in declaration order.
    pub fn observers(&self) -> impl Iterator<Item = &Arc<dyn FailureObserver>> {
        self.entries.iter().filter_map(|c| match c {
            Capability::Observer(o) => Some(o),
            _ => None,
        })
    }

    /// Names of all entries, in order.
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(Capability::name).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ProjectConfig;
    use crate::options::{OptionMap, OptionSpec, TaskConfig};
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Deserialize)]
    struct Any {}

    fn chain(caps: Vec<Capability>) -> Result<CapabilityChain, ChainError> {
        let mut chain = CapabilityChain::new();
        for cap in caps {
            chain.push(cap)?;
        }
        Ok(chain)
    }

    #[test]
    fn test_empty_chain_init_is_noop() {
        let project = ProjectConfig::default();
        let config = TaskConfig::default();
        let scope = InitScope {
            task: "Noop",
            config: &config,
            project: &project,
            org: None,
        };
        assert!(CapabilityChain::new().init_all(&scope).is_ok());
    }

    #[test]
    fn test_second_option_handler_is_rejected() {
        let mut caps = RequiredOptions.into_capabilities();
        caps.extend(SchemaOptions::<Any>::new().into_capabilities());

        let err = chain(caps).unwrap_err();
        assert_eq!(
            err,
            ChainError::ConflictingOptionHandlers {
                first: "required",
                second: "schema"
            }
        );
    }

    #[test]
    fn test_second_retry_is_rejected() {
        let mut caps = RetryPolicy::default().into_capabilities();
        caps.extend(RetryStrategy::FromOptions.into_capabilities());
        assert_eq!(chain(caps).unwrap_err(), ChainError::ConflictingRetry);
    }

    #[test]
    fn test_reporting_stacks_with_option_handler() {
        let mut caps = SchemaOptions::<Any>::new().into_capabilities();
        caps.extend(ErrorReporting.into_capabilities());

        let chain = chain(caps).unwrap();
        assert_eq!(chain.names(), vec!["schema", "error_reporting", "error_reporting"]);
        assert_eq!(chain.hooks().count(), 1);
        assert_eq!(chain.observers().count(), 1);
    }

    #[test]
    fn test_hooks_run_in_order_and_stop_on_error() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let (a, b, c) = (calls.clone(), calls.clone(), calls.clone());

        let mut caps = HookFn::new("first", move |_: &InitScope<'_>| {
            a.lock().unwrap().push("first");
            Ok(())
        })
        .into_capabilities();
        caps.extend(
            HookFn::new("second", move |_: &InitScope<'_>| {
                b.lock().unwrap().push("second");
                Err(TaskError::fatal("no session"))
            })
            .into_capabilities(),
        );
        caps.extend(
            HookFn::new("third", move |_: &InitScope<'_>| {
                c.lock().unwrap().push("third");
                Ok(())
            })
            .into_capabilities(),
        );
        let chain = chain(caps).unwrap();

        let project = ProjectConfig::default();
        let config = TaskConfig::default();
        let scope = InitScope {
            task: "Deploy",
            config: &config,
            project: &project,
            org: None,
        };
        let err = chain.init_all(&scope).unwrap_err();

        assert_eq!(*calls.lock().unwrap(), vec!["first", "second"]);
        match err {
            BuildError::Hook { stage, .. } => assert_eq!(stage, "second"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_validate_defaults_to_required_options() {
        let def = TaskDefinition::new().with_option(OptionSpec::required("path", ""));
        let empty = OptionSet::from(OptionMap::new());
        let err = CapabilityChain::new()
            .validate("Deploy", &def, &empty)
            .unwrap_err();
        assert_eq!(err.missing(), ["path".to_string()]);

        let schema = chain(SchemaOptions::<Any>::new().into_capabilities()).unwrap();
        assert!(schema.validate("Deploy", &def, &empty).is_ok());

        let set = OptionSet::from(json!({ "path": "src" }).as_object().cloned().unwrap());
        assert!(CapabilityChain::new().validate("Deploy", &def, &set).is_ok());
    }
}
