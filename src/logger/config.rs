use serde::{Deserialize, Serialize};

use crate::logger::format::LoggerFormat;

/// Subscriber settings.
///
/// Deserializable so it can live next to task configuration; missing fields take
/// their [`Default`] values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    /// `EnvFilter` directive, e.g. `info` or `taskctl=debug,warn`.
    pub level: String,
    pub with_targets: bool,
    pub use_color: bool,
    /// Log a line when each `task` span closes.
    pub task_spans: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::Text,
            level: "info".to_string(),
            with_targets: false,
            use_color: atty::is(atty::Stream::Stdout),
            task_spans: false,
        }
    }
}
