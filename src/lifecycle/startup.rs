//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the HTTP client, prober and gauge store
//! - Bind the exposition listener
//! - Start the refresh task and serve until shutdown

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::http::ExpositionServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::GaugeStore;
use crate::probe::Prober;
use crate::refresh::{ProbeTargets, RefreshTask};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Run the service until a shutdown signal arrives.
pub async fn run(config: Config) -> Result<(), StartupError> {
    let client = reqwest::Client::builder().build()?;
    let prober = Prober::new(client).with_timeout(config.probe_timeout);
    let store = GaugeStore::new();

    let listener = TcpListener::bind(config.metrics_address)
        .await
        .map_err(|source| StartupError::Bind {
            addr: config.metrics_address,
            source,
        })?;

    let shutdown = Shutdown::new();

    let task = RefreshTask::new(
        prober,
        store.clone(),
        ProbeTargets::from_config(&config),
        config.refresh_interval,
    );
    let refresh = tokio::spawn(task.run(shutdown.subscribe()));

    tokio::spawn(signals::wait_for_signal(shutdown.clone()));

    let server = ExpositionServer::new(store);
    let served = server.run(listener, shutdown.subscribe()).await;

    // The server can also stop on its own; make sure the refresh task follows.
    shutdown.trigger();
    let _ = refresh.await;

    served.map_err(StartupError::Serve)
}
