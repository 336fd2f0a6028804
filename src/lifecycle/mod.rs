//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Build tracker, prober, sinks → CycleRunner
//!
//! Shutdown (shutdown.rs):
//!     Signal received → broadcast → runner exits at next boundary
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, monitoring never begins
//! - No state is persisted; a restart begins with every link Unknown

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{Shutdown, ShutdownListener};
