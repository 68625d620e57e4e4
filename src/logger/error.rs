use thiserror::Error;

/// Errors produced while installing the log subscriber.
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("invalid logger format: {0} (expected: text|json)")]
    InvalidFormat(String),
    #[error("invalid log filter: {0}")]
    InvalidLogLevel(String),
    #[error("logger has been already initialized")]
    AlreadyInitialized,
}

impl LoggerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            LoggerError::InvalidFormat(_) => "logger_invalid_format",
            LoggerError::InvalidLogLevel(_) => "logger_invalid_level",
            LoggerError::AlreadyInitialized => "logger_already_initialized",
        }
    }
}
