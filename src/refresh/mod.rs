//! Periodic refresh of the mirror gauges.
//!
//! # Data Flow
//! ```text
//! task.rs
//!     Immediate first cycle, then sleep(refresh_interval) between cycles
//!     → for each backend, in configured order:
//!         prober.fetch_freshness    → store.set_freshness
//!         prober.fetch_availability → store.set_availability
//!     → failures are logged; the gauge keeps its previous value
//! ```
//!
//! # Design Decisions
//! - Backends are polled sequentially within a cycle
//! - One backend's failure never stops the others
//! - No retries inside a cycle; the next cycle is the retry
//! - Shutdown interrupts both the sleep and an in-flight cycle

pub mod task;

pub use task::{CycleReport, ProbeTargets, RefreshTask};
