//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Build the tracker, prober and sinks
//! - Start the metrics exporter when enabled

use std::path::Path;

use thiserror::Error;

use crate::config::{load_config, ConfigError, MonitorConfig};
use crate::monitor::{build_tracker, CycleRunner};
use crate::observability::metrics;
use crate::probe::NetworkProber;
use crate::sink::{ConsoleSink, FanoutSink, LogFileSink};

/// Errors that prevent monitoring from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Resolve the configuration source.
///
/// An explicitly given path must exist. Without one, `default_path` is used
/// if present, otherwise built-in defaults apply.
pub fn resolve_config(explicit: Option<&Path>, default_path: &Path) -> Result<MonitorConfig, ConfigError> {
    match explicit {
        Some(path) => load_config(path),
        None if default_path.exists() => load_config(default_path),
        None => {
            let config = MonitorConfig::default();
            crate::config::validation::validate_config(&config).map_err(ConfigError::Validation)?;
            Ok(config)
        }
    }
}

/// Production runner type.
pub type Runner = CycleRunner<NetworkProber, FanoutSink>;

/// Build a runner from a validated configuration.
pub fn build_runner(config: &MonitorConfig) -> Result<Runner, StartupError> {
    let tracker = build_tracker(config)?;
    let prober = NetworkProber::new(config.uses_icmp());
    let sink = FanoutSink::new()
        .with(LogFileSink::new(&config.log_file))
        .with(ConsoleSink::stdout());

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    if config.timeout_secs > config.interval_secs {
        tracing::warn!(
            timeout_secs = config.timeout_secs,
            interval_secs = config.interval_secs,
            "Probe timeout exceeds polling interval; a slow cycle will stretch the polling period"
        );
    }

    for link in tracker.links() {
        tracing::info!(link = %link.name(), target = %link.target(), "Link registered");
    }

    Ok(CycleRunner::new(
        tracker,
        prober,
        sink,
        config.interval(),
        config.timeout(),
    ))
}
