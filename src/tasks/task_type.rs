use std::borrow::Cow;
use std::sync::Arc;

use crate::capabilities::{Capability, CapabilityChain, IntoCapabilities, PollPolicy};
use crate::error::ChainError;
use crate::options::{OptionSpec, TaskDefinition};

/// Static description of a kind of task, shared by all of its controllers.
#[derive(Debug)]
pub struct TaskType {
    name: Cow<'static, str>,
    definition: TaskDefinition,
    requires_org: bool,
    chain: CapabilityChain,
    poll: PollPolicy,
}

impl TaskType {
    /// Creates a builder for constructing a task type with fluent API.
    pub fn builder(name: impl Into<Cow<'static, str>>) -> TaskTypeBuilder {
        TaskTypeBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared options.
    pub fn definition(&self) -> &TaskDefinition {
        &self.definition
    }

    /// True if a controller of this type needs an org context.
    pub fn requires_org(&self) -> bool {
        self.requires_org
    }

    pub fn chain(&self) -> &CapabilityChain {
        &self.chain
    }

    pub fn poll_policy(&self) -> PollPolicy {
        self.poll
    }
}

/// Builder for [`TaskType`].
///
/// Capability conflicts (two option handlers, two retry strategies) are reported
/// by [`build`](Self::build).
#[derive(Debug)]
pub struct TaskTypeBuilder {
    name: Cow<'static, str>,
    definition: TaskDefinition,
    requires_org: bool,
    capabilities: Vec<Capability>,
    poll: PollPolicy,
}

impl TaskTypeBuilder {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            definition: TaskDefinition::new(),
            requires_org: false,
            capabilities: Vec::new(),
            poll: PollPolicy::default(),
        }
    }

    /// Replaces the whole option definition.
    pub fn definition(mut self, definition: TaskDefinition) -> Self {
        self.definition = definition;
        self
    }

    /// Declares one option.
    pub fn option(mut self, spec: OptionSpec) -> Self {
        self.definition = self.definition.with_option(spec);
        self
    }

    pub fn requires_org(mut self, requires_org: bool) -> Self {
        self.requires_org = requires_org;
        self
    }

    /// Appends capabilities in declaration order.
    pub fn capability(mut self, capability: impl IntoCapabilities) -> Self {
        self.capabilities.extend(capability.into_capabilities());
        self
    }

    pub fn poll(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    pub fn build(self) -> Result<Arc<TaskType>, ChainError> {
        let mut chain = CapabilityChain::new();
        for capability in self.capabilities {
            chain.push(capability)?;
        }
        Ok(Arc::new(TaskType {
            name: self.name,
            definition: self.definition,
            requires_org: self.requires_org,
            chain,
            poll: self.poll,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::{ErrorReporting, RetryPolicy, RetryStrategy};

    #[test]
    fn test_builder_collects_declarations() {
        let task = TaskType::builder("Deploy")
            .option(OptionSpec::required("path", "Source directory"))
            .option(OptionSpec::optional("check_only", "Validate only"))
            .requires_org(true)
            .capability(ErrorReporting)
            .capability(RetryPolicy::default())
            .build()
            .unwrap();

        assert_eq!(task.name(), "Deploy");
        assert!(task.requires_org());
        assert_eq!(task.definition().len(), 2);
        assert_eq!(task.chain().names(), vec!["error_reporting", "error_reporting", "retry"]);
    }

    #[test]
    fn test_builder_rejects_conflicting_retry() {
        let err = TaskType::builder("Deploy")
            .capability(RetryPolicy::default())
            .capability(RetryStrategy::FromOptions)
            .build()
            .unwrap_err();
        assert_eq!(err, ChainError::ConflictingRetry);
    }
}
