//! HTTP exposition subsystem.
//!
//! # Data Flow
//! ```text
//! Prometheus scrape
//!     → server.rs (Axum router, trace layer)
//!     → GaugeStore::render (read-only snapshot)
//!     → text exposition response
//! ```

pub mod server;

pub use server::{ExpositionServer, EXPOSITION_CONTENT_TYPE};
