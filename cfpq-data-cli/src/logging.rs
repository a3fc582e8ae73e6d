//! Logging initialisation for the `cfpq-data` binary.
//!
//! Diagnostics go to `stderr` so the `Generated ...` lines on `stdout` stay
//! parseable. `RUST_LOG` sets the level and `CFPQ_LOG_FORMAT=json` switches to
//! one JSON object per event.

use std::env;

use thiserror::Error;
use tracing_log::LogTracer;
use tracing_subscriber::{
    EnvFilter, Layer, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Environment variable selecting `human` or `json` log output.
pub const LOG_FORMAT_ENV: &str = "CFPQ_LOG_FORMAT";

/// Errors raised while initialising structured logging.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Unsupported log format requested via `CFPQ_LOG_FORMAT`.
    #[error("unsupported log format `{provided}`; expected `human` or `json`")]
    UnsupportedFormat {
        /// Raw value supplied by the user.
        provided: String,
    },
    /// A global subscriber was already installed.
    #[error("failed to install tracing subscriber: {source}")]
    InstallFailed {
        /// Error raised by `tracing_subscriber`.
        #[source]
        source: tracing_subscriber::util::TryInitError,
    },
}

/// Installs the global subscriber and bridges the `log` facade into it.
///
/// # Errors
/// Returns [`LoggingError`] if `CFPQ_LOG_FORMAT` names an unknown format or a
/// global subscriber is already installed.
pub fn init_logging() -> Result<(), LoggingError> {
    let raw = env::var_os(LOG_FORMAT_ENV).map(|value| value.to_string_lossy().into_owned());
    let json = wants_json(raw.as_deref())?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);
    let fmt_layer = if json {
        fmt_layer.json().with_current_span(true).boxed()
    } else {
        fmt_layer.boxed()
    };

    if LogTracer::init().is_err() {
        tracing::debug!("log facade already bridged");
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|source| LoggingError::InstallFailed { source })
}

fn wants_json(raw: Option<&str>) -> Result<bool, LoggingError> {
    match raw.map(|value| value.trim().to_ascii_lowercase()).as_deref() {
        None | Some("" | "human") => Ok(false),
        Some("json") => Ok(true),
        Some(other) => Err(LoggingError::UnsupportedFormat {
            provided: other.to_owned(),
        }),
    }
}
