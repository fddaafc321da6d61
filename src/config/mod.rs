//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! process environment / argv
//!     → schema.rs (clap derive, per-field value parsers)
//!     → duration.rs (Go-style durations: "4h", "1h30m", "250ms")
//!     → Config::normalize + Config::validate (semantic checks)
//!     → Config (validated, immutable)
//!     → handed by value to the refresh task and exposition server
//! ```
//!
//! # Design Decisions
//! - Every setting has an environment variable; flags exist for local runs
//! - Config is immutable once loaded; there is no reload
//! - Any configuration error is fatal at startup

pub mod duration;
pub mod schema;

pub use duration::{parse_duration, DurationError};
pub use schema::{Config, ConfigError};
