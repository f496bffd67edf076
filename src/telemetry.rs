//! Log subscriber setup.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Raised when the log subscriber cannot be installed.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The level string is not a valid filter directive.
    #[error("invalid log level {level:?}: {reason}")]
    InvalidLevel {
        /// Rejected level.
        level: String,
        /// Parser message.
        reason: String,
    },
    /// A global subscriber is already installed.
    #[error("log subscriber already installed: {0}")]
    AlreadyInstalled(String),
}

/// Builds the filter for `level`, letting `RUST_LOG` refine it.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidLevel`] for unparseable levels.
pub fn filter_for(level: &str) -> Result<EnvFilter, TelemetryError> {
    let directive = level.parse().map_err(|err: tracing_subscriber::filter::ParseError| {
        TelemetryError::InvalidLevel {
            level: level.to_owned(),
            reason: err.to_string(),
        }
    })?;
    Ok(EnvFilter::from_default_env().add_directive(directive))
}

/// Installs a global formatter writing to stderr.
///
/// Stdout is left to command output.
///
/// # Errors
///
/// Returns [`TelemetryError`] for invalid levels or a second install.
pub fn init(level: &str) -> Result<(), TelemetryError> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter_for(level)?)
        .with_target(false)
        .try_init()
        .map_err(|err| TelemetryError::AlreadyInstalled(err.to_string()))
}
