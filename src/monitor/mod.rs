//! Monitoring cycle.
//!
//! # Data Flow
//! ```text
//! interval tick
//!     → probe every link concurrently (join barrier, per-probe timeout)
//!     → classify_probe()
//!     → LinkTracker::record_outcome() in configuration order
//!     → EventSink::record() for each emitted event
//!     → wait the interval, or stop on shutdown
//! ```
//!
//! # Design Decisions
//! - Shutdown is checked at cycle boundaries and while waiting
//! - A failing sink is reported but never stops monitoring
//! - No retries within a cycle; the next cycle is the retry

pub mod runner;

pub use runner::{build_tracker, CycleReport, CycleRunner};
