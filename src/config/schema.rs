//! Configuration schema definitions.
//!
//! Every field is sourced from an environment variable (with a matching
//! command-line flag), mirroring how the service is deployed.

use std::collections::HashSet;
use std::ffi::OsString;
use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;
use url::Url;

use crate::config::duration::parse_duration;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Missing or unparseable variable, or a `--help`/`--version` request.
    #[error(transparent)]
    Cli(#[from] clap::Error),

    #[error("REFRESH_INTERVAL must be greater than zero")]
    ZeroRefreshInterval,

    #[error("PROBE_TIMEOUT must be greater than zero when set")]
    ZeroProbeTimeout,
}

/// Root configuration for the mirror monitor.
#[derive(Debug, Clone, Parser)]
#[command(name = "mirror-monitor", version, about = "Export mirror freshness and availability as Prometheus gauges")]
pub struct Config {
    /// URL probed for the `Last-Modified` header of each backend.
    #[arg(long, env = "MIRROR_FRESHNESS_URL", value_parser = parse_probe_url)]
    pub mirror_freshness_url: Url,

    /// URL probed for the response status code of each backend.
    #[arg(long, env = "MIRROR_AVAILABILITY_URL", value_parser = parse_probe_url)]
    pub mirror_availability_url: Url,

    /// Comma-separated backend names, polled in this order.
    #[arg(long, env = "BACKENDS", value_delimiter = ',')]
    pub backends: Vec<String>,

    /// Delay between polling cycles.
    #[arg(long, env = "REFRESH_INTERVAL", default_value = "4h", value_parser = parse_duration)]
    pub refresh_interval: Duration,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "LOG_LEVEL", default_value = "INFO")]
    pub log_level: String,

    /// Exposition endpoint bind address.
    #[arg(long, env = "METRICS_ADDRESS", default_value = "0.0.0.0:9090")]
    pub metrics_address: SocketAddr,

    /// Optional per-request probe timeout. Unset means the HTTP client default.
    #[arg(long, env = "PROBE_TIMEOUT", value_parser = parse_duration)]
    pub probe_timeout: Option<Duration>,
}

impl Config {
    /// Load configuration from the process environment and argv.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_args(std::env::args_os())
    }

    /// Load configuration from an explicit argument list (environment
    /// variables still fill in anything not given as a flag).
    pub fn from_args<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let mut config = Self::try_parse_from(args)?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Trim backend names, drop empty entries and repeated names.
    pub fn normalize(&mut self) {
        let mut seen = HashSet::new();
        self.backends = std::mem::take(&mut self.backends)
            .into_iter()
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty())
            .filter(|b| seen.insert(b.clone()))
            .collect();
    }

    /// Semantic checks that clap cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh_interval.is_zero() {
            return Err(ConfigError::ZeroRefreshInterval);
        }
        if self.probe_timeout.is_some_and(|t| t.is_zero()) {
            return Err(ConfigError::ZeroProbeTimeout);
        }
        Ok(())
    }
}

fn parse_probe_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw).map_err(|e| format!("invalid URL {raw:?}: {e}"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported scheme {other:?} in {raw:?}")),
    }
}
