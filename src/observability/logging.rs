//! Structured logging.
//!
//! # Responsibilities
//! - Parse the configured log level
//! - Install the global tracing subscriber once at startup

use std::str::FromStr;

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log level {0:?}")]
    InvalidLevel(String),

    #[error("failed to install log subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Parse a log level name, case-insensitively.
///
/// `warning` is accepted as `warn`; `fatal` and `panic` map to `error`.
/// `disabled` and the empty string turn logging off.
pub fn parse_level(raw: &str) -> Result<LevelFilter, LoggingError> {
    let normalized = raw.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "" | "disabled" => Ok(LevelFilter::OFF),
        "warning" => Ok(LevelFilter::WARN),
        "fatal" | "panic" => Ok(LevelFilter::ERROR),
        other => Level::from_str(other)
            .map(LevelFilter::from_level)
            .map_err(|_| LoggingError::InvalidLevel(raw.to_string())),
    }
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` directives, if present, take precedence over `level`.
pub fn init_logging(level: &str) -> Result<(), LoggingError> {
    let level = parse_level(level)?;
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    Ok(())
}
