//! # Optional `tracing` subscriber setup (feature `logger`).
//!
//! The library itself only emits `tracing` events. Binaries and demos call
//! [`logger_init`] once to install a subscriber:
//!
//! ```text
//! LoggerConfig { format, level, with_targets, use_color, task_spans }
//!     └─► registry ─► EnvFilter(level) ─► fmt layer (text | json, RFC 3339 local time)
//! ```
//!
//! With `task_spans` on, the closing of each `task` span is logged with its duration,
//! which gives one line per finished controller run.

mod config;
mod error;
mod format;
mod log;

pub use config::LoggerConfig;
pub use error::LoggerError;
pub use format::LoggerFormat;

/// Installs the global subscriber described by `cfg`.
///
/// Fails with [`LoggerError::AlreadyInitialized`] on a second call.
pub fn logger_init(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    match cfg.format {
        LoggerFormat::Text => log::install_text(cfg),
        LoggerFormat::Json => log::install_json(cfg),
    }
}
