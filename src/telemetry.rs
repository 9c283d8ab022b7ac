//! Tracing subscriber setup.

use std::env::{self, VarError};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Environment variable consulted for the log filter.
pub const LOG_ENV: &str = "CIVIC_LOG";

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// `CIVIC_LOG` or the fallback directive could not be parsed.
    #[error("invalid log filter '{directive}': {message}")]
    InvalidFilter {
        /// Directive that failed to parse.
        directive: String,
        /// Parser message.
        message: String,
    },
    /// A global subscriber was already installed.
    #[error("failed to initialise tracing subscriber: {0}")]
    Install(String),
}

/// Resolves the filter from `CIVIC_LOG`, falling back to `default_filter`
/// only when the variable is unset.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] when `CIVIC_LOG` is set to an
/// invalid directive or non-Unicode value, or when it is unset and
/// `default_filter` is invalid.
pub fn resolve_filter(default_filter: &str) -> Result<EnvFilter, TelemetryError> {
    match env::var(LOG_ENV) {
        Ok(directive) => parse_filter(&directive),
        Err(VarError::NotPresent) => parse_filter(default_filter),
        Err(err @ VarError::NotUnicode(_)) => Err(TelemetryError::InvalidFilter {
            directive: LOG_ENV.to_owned(),
            message: err.to_string(),
        }),
    }
}

fn parse_filter(directive: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(directive).map_err(|err| TelemetryError::InvalidFilter {
        directive: directive.to_owned(),
        message: err.to_string(),
    })
}

/// Installs the global `fmt` subscriber.
///
/// # Errors
///
/// Returns [`TelemetryError`] when the filter is invalid or a subscriber is
/// already installed.
pub fn init_tracing(default_filter: &str) -> Result<(), TelemetryError> {
    let filter = resolve_filter(default_filter)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| TelemetryError::Install(err.to_string()))
}
