use tracing::Subscriber;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::{LoggerConfig, LoggerError, LoggerFormat, LoggerResult, LoggerTimer};

/// Install the global tracing subscriber described by `cfg`.
///
/// Fails with [`LoggerError::AlreadyInitialized`] when a global subscriber exists.
/// With `LoggerTimeZone::Local`, call this before the tokio runtime starts its worker
/// threads, otherwise timestamps fall back to UTC.
///
/// # Examples
/// ```no_run
/// use relay_observe::{LoggerConfig, init_logger};
///
/// init_logger(&LoggerConfig::default()).expect("logger");
/// tracing::info!("logger initialized");
/// ```
pub fn init_logger(cfg: &LoggerConfig) -> LoggerResult<()> {
    let timer = LoggerTimer::for_zone(cfg.tz);
    match cfg.format {
        LoggerFormat::Text => logger_text(cfg, timer)?,
        LoggerFormat::Json => logger_json(cfg, timer)?,
        LoggerFormat::Journald => logger_journald(cfg)?,
    }
    if timer.is_fallback() {
        tracing::warn!("local timezone detection failed, logging in UTC");
    }
    Ok(())
}

fn span_events(cfg: &LoggerConfig) -> FmtSpan {
    if cfg.with_span_events {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    }
}

fn logger_text(cfg: &LoggerConfig, timer: LoggerTimer) -> LoggerResult<()> {
    let layer = fmt::layer()
        .with_ansi(cfg.should_use_color())
        .with_target(cfg.with_targets)
        .with_span_events(span_events(cfg))
        .with_timer(timer);

    install(tracing_subscriber::registry().with(cfg.level.to_env_filter()).with(layer))
}

fn logger_json(cfg: &LoggerConfig, timer: LoggerTimer) -> LoggerResult<()> {
    let layer = fmt::layer()
        .json()
        .with_ansi(false)
        .with_target(cfg.with_targets)
        .with_current_span(true)
        .with_span_events(span_events(cfg))
        .with_timer(timer);

    install(tracing_subscriber::registry().with(cfg.level.to_env_filter()).with(layer))
}

#[cfg(target_os = "linux")]
fn logger_journald(cfg: &LoggerConfig) -> LoggerResult<()> {
    let layer =
        tracing_journald::layer().map_err(|e| LoggerError::JournaldInitFailed(e.to_string()))?;
    install(tracing_subscriber::registry().with(cfg.level.to_env_filter()).with(layer))
}

#[cfg(not(target_os = "linux"))]
fn logger_journald(_cfg: &LoggerConfig) -> LoggerResult<()> {
    Err(LoggerError::JournaldNotSupported)
}

fn install<S>(subscriber: S) -> LoggerResult<()>
where
    S: Subscriber + Send + Sync + 'static,
{
    subscriber
        .try_init()
        .map_err(|_| LoggerError::AlreadyInitialized)
}
