use time::{UtcOffset, format_description::well_known::Rfc3339};
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, fmt::time::OffsetTime, layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::logger::{config::LoggerConfig, error::LoggerError, format::LoggerFormat};

/// Output layer of the subscriber, before filtering.
type Sink = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Build the filtered sink for `cfg` and set it as the global default.
pub(crate) fn install(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    if tracing::dispatcher::has_been_set() {
        return Err(LoggerError::AlreadyInitialized);
    }

    let filter = parse_filter(&cfg.level)?;
    let sink = sink(cfg)?.with_filter(filter);

    tracing_subscriber::registry()
        .with(sink)
        .try_init()
        .map_err(|e| LoggerError::Install(e.to_string()))
}

fn sink(cfg: &LoggerConfig) -> Result<Sink, LoggerError> {
    let timer = local_rfc3339();
    Ok(match cfg.format {
        LoggerFormat::Text => fmt::layer()
            .with_ansi(cfg.use_color)
            .with_target(cfg.with_targets)
            .with_timer(timer)
            .boxed(),
        LoggerFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(cfg.with_targets)
            .with_timer(timer)
            .boxed(),
        LoggerFormat::Journald => journald()?,
    })
}

pub(crate) fn parse_filter(directive: &str) -> Result<EnvFilter, LoggerError> {
    EnvFilter::try_new(directive).map_err(|source| LoggerError::InvalidFilter {
        directive: directive.to_string(),
        source,
    })
}

// Falls back to UTC when the local offset cannot be determined soundly.
fn local_rfc3339() -> OffsetTime<Rfc3339> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetTime::new(offset, Rfc3339)
}

#[cfg(all(target_os = "linux", feature = "journald"))]
fn journald() -> Result<Sink, LoggerError> {
    let layer = tracing_journald::layer()
        .map_err(|e| LoggerError::Install(format!("journald: {e}")))?
        .with_syslog_identifier("hookline".to_string());
    Ok(layer.boxed())
}

#[cfg(not(all(target_os = "linux", feature = "journald")))]
fn journald() -> Result<Sink, LoggerError> {
    Err(LoggerError::JournaldUnavailable)
}
