//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → MonitorConfig (validated, immutable)
//!     → LinkTracker + CycleRunner built from it
//! ```
//!
//! # Design Decisions
//! - Config is static; it is read once at startup
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Any validation error is fatal: monitoring does not start

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::LinkConfig;
pub use schema::LogFormat;
pub use schema::MonitorConfig;
pub use schema::ObservabilityConfig;
