//! Link reachability monitor with debounced UP/DOWN reporting.

pub mod config;
pub mod lifecycle;
pub mod monitor;
pub mod observability;
pub mod probe;
pub mod sink;
pub mod tracker;

pub use config::schema::MonitorConfig;
pub use lifecycle::Shutdown;
pub use monitor::CycleRunner;
pub use tracker::{LinkTracker, StateChangeEvent};
