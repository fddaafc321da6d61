//! Gauge store and Prometheus exposition.
//!
//! # Metrics
//! - `govuk_mirror_last_updated_time` (gauge): `Last-Modified` of each backend, epoch seconds
//! - `govuk_mirror_response_status_code` (gauge): status code of the availability probe
//!
//! Both carry a single `backend` label.
//!
//! # Design Decisions
//! - The recorder is owned by the store and never installed globally, so
//!   independent stores (e.g. one per test) do not interfere
//! - A series is registered on its first successful sample; backends that
//!   never succeed never appear
//! - Each series is an atomic gauge; there is no lock across series

use std::sync::Arc;

use metrics::{Key, Label, Level, Metadata, Recorder};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle, PrometheusRecorder};

pub const LAST_UPDATED_TIME: &str = "govuk_mirror_last_updated_time";
pub const RESPONSE_STATUS_CODE: &str = "govuk_mirror_response_status_code";
pub const BACKEND_LABEL: &str = "backend";

const LAST_UPDATED_TIME_HELP: &str = "Last time the mirror was updated";
const RESPONSE_STATUS_CODE_HELP: &str = "Response status code for the MIRROR_AVAILABILITY_URL probe";

static METADATA: Metadata<'static> = Metadata::new(module_path!(), Level::INFO, Some(module_path!()));

struct Inner {
    recorder: PrometheusRecorder,
    handle: PrometheusHandle,
}

/// In-memory, label-keyed store for the mirror gauges.
///
/// Cloning is cheap and every clone shares the same series.
#[derive(Clone)]
pub struct GaugeStore {
    inner: Arc<Inner>,
}

impl GaugeStore {
    pub fn new() -> Self {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        recorder.describe_gauge(LAST_UPDATED_TIME.into(), None, LAST_UPDATED_TIME_HELP.into());
        recorder.describe_gauge(RESPONSE_STATUS_CODE.into(), None, RESPONSE_STATUS_CODE_HELP.into());

        Self {
            inner: Arc::new(Inner { recorder, handle }),
        }
    }

    fn set(&self, metric: &'static str, backend: &str, value: f64) {
        let key = Key::from_parts(metric, vec![Label::new(BACKEND_LABEL, backend.to_string())]);
        self.inner.recorder.register_gauge(&key, &METADATA).set(value);
    }

    /// Overwrite `govuk_mirror_last_updated_time{backend}`.
    pub fn set_freshness(&self, backend: &str, seconds: f64) {
        self.set(LAST_UPDATED_TIME, backend, seconds);
    }

    /// Overwrite `govuk_mirror_response_status_code{backend}`.
    pub fn set_availability(&self, backend: &str, status: u16) {
        self.set(RESPONSE_STATUS_CODE, backend, f64::from(status));
    }

    /// Render every series in the Prometheus text exposition format.
    pub fn render(&self) -> String {
        self.inner.handle.render()
    }

    /// Current freshness value for a backend, if it ever succeeded.
    pub fn freshness(&self, backend: &str) -> Option<f64> {
        self.value(LAST_UPDATED_TIME, backend)
    }

    /// Current availability value for a backend, if it ever succeeded.
    pub fn availability(&self, backend: &str) -> Option<f64> {
        self.value(RESPONSE_STATUS_CODE, backend)
    }

    /// Number of labeled series currently exposed for `metric`.
    pub fn series_count(&self, metric: &str) -> usize {
        self.samples(metric).len()
    }

    fn value(&self, metric: &str, backend: &str) -> Option<f64> {
        self.samples(metric)
            .into_iter()
            .find(|(label, _)| label == backend)
            .map(|(_, value)| value)
    }

    /// `(backend, value)` pairs for `metric`, read from one rendered snapshot.
    pub fn samples(&self, metric: &str) -> Vec<(String, f64)> {
        parse_samples(&self.render(), metric)
    }
}

impl Default for GaugeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GaugeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GaugeStore").finish_non_exhaustive()
    }
}

/// Extract `metric{backend="..."} value` lines from exposition text.
fn parse_samples(text: &str, metric: &str) -> Vec<(String, f64)> {
    let prefix = format!("{metric}{{{BACKEND_LABEL}=\"");

    text.lines()
        .filter_map(|line| line.strip_prefix(prefix.as_str()))
        .filter_map(|rest| {
            let (label, value) = rest.rsplit_once("\"} ")?;
            let value = value.split_whitespace().next()?.parse().ok()?;
            Some((unescape_label(label), value))
        })
        .collect()
}

fn unescape_label(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
