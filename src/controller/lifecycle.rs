use std::fmt;

/// Lifecycle state of a [`TaskController`](crate::TaskController).
///
/// ```text
/// Created ─► Initializing ─► Validated ─► Ready ─► Executing ─► Completed
///                                                            └─► Failed
/// ```
///
/// States only move forward. A controller that construction hands back is always
/// `Ready`; the earlier states are only visible in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    /// Instance allocated, nothing checked yet.
    Created,
    /// Running init hooks and resolving options.
    Initializing,
    /// Options accepted by the option handler.
    Validated,
    /// Construction finished; `run` may be called once.
    Ready,
    /// Action in progress.
    Executing,
    /// Action succeeded.
    Completed,
    /// Action failed; the error was intercepted and returned.
    Failed,
}

impl Lifecycle {
    /// Stable snake_case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Lifecycle::Created => "created",
            Lifecycle::Initializing => "initializing",
            Lifecycle::Validated => "validated",
            Lifecycle::Ready => "ready",
            Lifecycle::Executing => "executing",
            Lifecycle::Completed => "completed",
            Lifecycle::Failed => "failed",
        }
    }

    /// True for `Completed` and `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Lifecycle::Completed | Lifecycle::Failed)
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
