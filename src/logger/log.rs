use time::{UtcOffset, format_description::well_known::Rfc3339};
use tracing::Subscriber;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan, time::OffsetTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::logger::{config::LoggerConfig, error::LoggerError};

pub(super) fn install_text(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    let filter = filter(&cfg.level)?;
    let layer = fmt::layer()
        .with_ansi(cfg.use_color)
        .with_target(cfg.with_targets)
        .with_span_events(span_events(cfg))
        .with_timer(timer());

    install(tracing_subscriber::registry().with(filter).with(layer))
}

pub(super) fn install_json(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    let filter = filter(&cfg.level)?;
    let layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_ansi(false)
        .with_target(cfg.with_targets)
        .with_span_events(span_events(cfg))
        .with_timer(timer());

    install(tracing_subscriber::registry().with(filter).with(layer))
}

fn filter(level: &str) -> Result<EnvFilter, LoggerError> {
    EnvFilter::try_new(level).map_err(|_| LoggerError::InvalidLogLevel(level.to_string()))
}

fn span_events(cfg: &LoggerConfig) -> FmtSpan {
    if cfg.task_spans {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    }
}

fn timer() -> OffsetTime<Rfc3339> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetTime::new(offset, Rfc3339)
}

fn install<S>(subscriber: S) -> Result<(), LoggerError>
where
    S: Subscriber + Send + Sync + 'static,
{
    // Only fails when a global dispatcher (or `log` logger) is already installed.
    subscriber
        .try_init()
        .map_err(|_| LoggerError::AlreadyInitialized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_filter_is_reported() {
        let err = filter("taskctl=loud").unwrap_err();
        assert_eq!(err.as_label(), "logger_invalid_level");
    }

    #[test]
    fn test_second_init_reports_already_initialized() {
        let cfg = LoggerConfig::default();
        let _ = install_text(&cfg);
        let err = install_json(&cfg).unwrap_err();
        assert!(matches!(err, LoggerError::AlreadyInitialized));
        assert_eq!(err.as_label(), "logger_already_initialized");
    }
}
