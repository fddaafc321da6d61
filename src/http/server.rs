//! Exposition server.
//!
//! # Responsibilities
//! - Serve `GET /metrics` from the gauge store
//! - Serve `GET /healthz` for liveness probes
//! - Stop serving on shutdown

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::observability::GaugeStore;

/// Content type of the Prometheus text exposition format.
pub const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// HTTP server exposing the gauge store.
pub struct ExpositionServer {
    router: Router,
}

impl ExpositionServer {
    pub fn new(store: GaugeStore) -> Self {
        Self {
            router: Self::build_router(store),
        }
    }

    /// Build the Axum router with all middleware layers.
    pub fn build_router(store: GaugeStore) -> Router {
        Router::new()
            .route("/metrics", get(metrics_handler))
            .route("/healthz", get(healthz_handler))
            .with_state(store)
            .layer(TraceLayer::new_for_http())
    }

    /// Serve on `listener` until shutdown is signalled.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Exposition server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("Exposition server stopped");
        Ok(())
    }
}

async fn metrics_handler(State(store): State<GaugeStore>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)],
        store.render(),
    )
}

async fn healthz_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
