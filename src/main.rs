//! Mirror monitor.
//!
//! Polls mirror backends for freshness (`Last-Modified`) and availability
//! (status code) and exposes the results as Prometheus gauges.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌────────────────────────────────────────────────────────────┐
//!   │                      MIRROR MONITOR                         │
//!   │                                                             │
//!   │  ┌──────────────┐    ┌──────────┐   Backend-Override: b    │
//!   │  │ refresh task │───▶│  prober  │──────────────────────────┼──▶ Mirror
//!   │  │  (interval)  │    └────┬─────┘                          │
//!   │  └──────┬───────┘         │ seconds / status code          │
//!   │         ▼                 ▼                                │
//!   │  ┌──────────────────────────────┐    ┌──────────────────┐  │
//!   │  │         gauge store          │◀───│ GET /metrics     │◀─┼── Prometheus
//!   │  └──────────────────────────────┘    └──────────────────┘  │
//!   └────────────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

use mirror_monitor::config::{Config, ConfigError};
use mirror_monitor::lifecycle;
use mirror_monitor::observability::init_logging;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        // --help and --version are not failures
        Err(ConfigError::Cli(e)) if !e.use_stderr() => e.exit(),
        Err(e) => {
            // Logging is configured from Config, so fall back to a default subscriber.
            let _ = init_logging("info");
            tracing::error!(error = %e, "Error parsing configuration");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(&config.log_level) {
        eprintln!("Error parsing log level: {e}");
        return ExitCode::FAILURE;
    }

    tracing::info!(
        freshness_url = %config.mirror_freshness_url,
        availability_url = %config.mirror_availability_url,
        backends = ?config.backends,
        refresh_interval = ?config.refresh_interval,
        probe_timeout = ?config.probe_timeout,
        metrics_address = %config.metrics_address,
        "Configuration loaded"
    );

    match lifecycle::run(config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Server error");
            ExitCode::FAILURE
        }
    }
}
