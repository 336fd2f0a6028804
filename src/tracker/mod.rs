//! Link state tracking.
//!
//! # Data Flow
//! ```text
//! ProbeOutcome (per link, per cycle)
//!     → engine.rs  LinkTracker::record_outcome()
//!     → link.rs    counters updated, threshold checked
//!     → event.rs   StateChangeEvent (zero or one per call)
//!     → sink
//! ```
//!
//! # State Machine (per link)
//! ```text
//! Unknown → Up      consecutive successes >= threshold
//! Unknown → Down    consecutive failures  >= threshold
//! Up      → Down    consecutive failures  >= threshold
//! Down    → Up      consecutive successes >= threshold
//! ```
//!
//! # Design Decisions
//! - One `Link` record per configured endpoint, owned by the tracker
//! - Success and failure counters reset each other
//! - Down is evaluated before Up
//! - No I/O; the tracker cannot fail

pub mod engine;
pub mod event;
pub mod link;

pub use engine::{LinkId, LinkTracker};
pub use event::{LogRecord, StateChangeEvent};
pub use link::{Link, LinkState, Status};
