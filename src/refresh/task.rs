//! The refresh loop.

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time;
use url::Url;

use crate::config::Config;
use crate::observability::metrics::{GaugeStore, LAST_UPDATED_TIME, RESPONSE_STATUS_CODE};
use crate::probe::{ProbeError, ProbeErrorKind, Prober};

/// What to poll each cycle.
#[derive(Debug, Clone)]
pub struct ProbeTargets {
    pub freshness_url: Url,
    pub availability_url: Url,
    pub backends: Vec<String>,
}

impl ProbeTargets {
    pub fn from_config(config: &Config) -> Self {
        Self {
            freshness_url: config.mirror_freshness_url.clone(),
            availability_url: config.mirror_availability_url.clone(),
            backends: config.backends.clone(),
        }
    }
}

/// Outcome counts for one refresh cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub freshness_updated: usize,
    pub freshness_failed: usize,
    pub availability_updated: usize,
    pub availability_failed: usize,
}

impl CycleReport {
    pub fn failures(&self) -> usize {
        self.freshness_failed + self.availability_failed
    }
}

pub struct RefreshTask {
    prober: Prober,
    store: GaugeStore,
    targets: ProbeTargets,
    interval: Duration,
}

impl RefreshTask {
    pub fn new(prober: Prober, store: GaugeStore, targets: ProbeTargets, interval: Duration) -> Self {
        Self {
            prober,
            store,
            targets,
            interval,
        }
    }

    pub fn store(&self) -> &GaugeStore {
        &self.store
    }

    /// Run cycles until shutdown is signalled.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval = ?self.interval,
            backends = ?self.targets.backends,
            "Refresh task starting"
        );

        if self.targets.backends.is_empty() {
            tracing::warn!("No backends configured, nothing will be probed");
        }

        let mut cycle: u64 = 0;
        loop {
            cycle += 1;
            tokio::select! {
                report = self.refresh_once() => {
                    tracing::info!(
                        cycle,
                        freshness_updated = report.freshness_updated,
                        freshness_failed = report.freshness_failed,
                        availability_updated = report.availability_updated,
                        availability_failed = report.availability_failed,
                        "Refresh cycle complete"
                    );
                }
                _ = shutdown.recv() => {
                    tracing::info!(cycle, "Refresh task received shutdown signal during cycle, exiting loop");
                    break;
                }
            }

            tokio::select! {
                _ = time::sleep(self.interval) => {}
                _ = shutdown.recv() => {
                    tracing::info!("Refresh task received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Poll every backend once and update the gauges.
    pub async fn refresh_once(&self) -> CycleReport {
        let mut report = CycleReport::default();

        for backend in &self.targets.backends {
            match self
                .prober
                .fetch_freshness(backend, &self.targets.freshness_url)
                .await
            {
                Ok(seconds) => {
                    self.store.set_freshness(backend, seconds);
                    report.freshness_updated += 1;
                }
                Err(e) => {
                    log_probe_failure(LAST_UPDATED_TIME, backend, &e);
                    report.freshness_failed += 1;
                }
            }

            match self
                .prober
                .fetch_availability(backend, &self.targets.availability_url)
                .await
            {
                Ok(status) => {
                    self.store.set_availability(backend, status);
                    report.availability_updated += 1;
                }
                Err(e) => {
                    log_probe_failure(RESPONSE_STATUS_CODE, backend, &e);
                    report.availability_failed += 1;
                }
            }
        }

        report
    }
}

fn log_probe_failure(metric: &'static str, backend: &str, error: &ProbeError) {
    let kind = error.kind();
    match kind {
        ProbeErrorKind::Transport => tracing::error!(
            metric,
            backend = %backend,
            error_kind = %kind,
            error = %error,
            "Error updating metrics: probe request failed"
        ),
        ProbeErrorKind::UnexpectedStatus => tracing::error!(
            metric,
            backend = %backend,
            error_kind = %kind,
            error = %error,
            "Error updating metrics: unexpected status"
        ),
        ProbeErrorKind::Parse => tracing::error!(
            metric,
            backend = %backend,
            error_kind = %kind,
            error = %error,
            "Error updating metrics: unparseable Last-Modified"
        ),
    }
}
