//! Mirror freshness and availability exporter.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod probe;
pub mod refresh;

pub use config::Config;
pub use observability::GaugeStore;
pub use probe::Prober;
pub use refresh::RefreshTask;
