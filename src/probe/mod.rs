//! Mirror probing subsystem.
//!
//! # Data Flow
//! ```text
//! refresh task
//!     → prober.rs (GET url, Backend-Override: <backend>)
//!     → freshness: 200 + Last-Modified → http_date.rs → epoch seconds
//!     → availability: any status code is the sample
//!     → error.rs classifies failures (transport / unexpected status / parse)
//! ```
//!
//! # Design Decisions
//! - The HTTP client is injected, never a process-wide singleton
//! - No retries: the next refresh cycle is the retry
//! - No timeout unless one is configured explicitly

pub mod error;
pub mod http_date;
pub mod prober;

pub use error::{ProbeError, ProbeErrorKind};
pub use http_date::{parse_http_date, HttpDateError};
pub use prober::{Prober, BACKEND_OVERRIDE};
