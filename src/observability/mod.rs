//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! refresh task / prober / exposition server
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (gauge store, rendered on scrape)
//! ```
//!
//! # Design Decisions
//! - Log level comes from LOG_LEVEL; RUST_LOG wins when set
//! - The gauge store is an injected instance, not a global recorder

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, parse_level, LoggingError};
pub use metrics::GaugeStore;
