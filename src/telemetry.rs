//! Process-wide logging for the provider binary.
//!
//! Events are written to stderr. Records emitted through the `log` facade by dependencies are
//! forwarded into the same subscriber so they share its filter and format.

use std::env;
use std::sync::OnceLock;

use log::LevelFilter;
use thiserror::Error;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_log::LogTracer;
use tracing_subscriber::{EnvFilter, filter::ParseError, fmt, layer::Layer, layer::SubscriberExt};

use crate::config::ProviderConfig;

#[derive(Debug, Error)]
pub enum TelemetryInitError {
    #[error("invalid log filter `{directives}`: {source}")]
    Filter {
        directives: String,
        #[source]
        source: ParseError,
    },
    #[error("another component already owns the global tracing subscriber: {0}")]
    Subscriber(#[from] SetGlobalDefaultError),
    #[error("`log` records cannot be routed into tracing: {0}")]
    LogBridge(#[from] log::SetLoggerError),
}

static INSTALLED: OnceLock<()> = OnceLock::new();

/// Installs the stderr subscriber and the `log` bridge. Later calls are no-ops.
///
/// A non-empty `RUST_LOG` replaces the configured log level.
pub fn init_tracing(config: &ProviderConfig) -> Result<(), TelemetryInitError> {
    if INSTALLED.get().is_some() {
        return Ok(());
    }

    let directives = filter_directives(config);
    let filter = EnvFilter::try_new(&directives).map_err(|source| TelemetryInitError::Filter {
        directives: directives.clone(),
        source,
    })?;
    let output = match config.log_format.as_str() {
        "pretty" => fmt::layer().pretty().with_writer(std::io::stderr).boxed(),
        _ => fmt::layer()
            .json()
            .with_current_span(true)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing::subscriber::set_global_default(tracing_subscriber::registry().with(filter).with(output))?;
    LogTracer::init_with_filter(bridge_level(&directives))?;
    let _ = INSTALLED.set(());
    Ok(())
}

fn filter_directives(config: &ProviderConfig) -> String {
    env::var(EnvFilter::DEFAULT_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| config.log_level.clone())
}

/// Ceiling for records crossing the `log` bridge. Per-target directives are left to the
/// subscriber's filter, so anything other than a bare level forwards everything.
fn bridge_level(directives: &str) -> LevelFilter {
    directives.trim().parse().unwrap_or(LevelFilter::Trace)
}
