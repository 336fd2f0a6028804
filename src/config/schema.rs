//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::probe::{ProbeMethod, ProbeTarget};

/// Root configuration for the monitor.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Links to monitor, in probing order.
    pub links: Vec<LinkConfig>,

    /// Seconds to wait after a cycle ends before the next one starts.
    pub interval_secs: u64,

    /// Consecutive identical outcomes required to confirm a transition.
    pub threshold: u32,

    /// Per-probe timeout in seconds.
    pub timeout_secs: u64,

    /// Append-only event log.
    pub log_file: PathBuf,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            links: vec![
                LinkConfig::icmp("Core", "8.8.8.8"),
                LinkConfig::icmp("Backhaul", "1.1.1.1"),
                LinkConfig::icmp("Aggregation", "10.100.152.21"),
            ],
            interval_secs: 5,
            threshold: 3,
            timeout_secs: 2,
            log_file: PathBuf::from("log.txt"),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl MonitorConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// True if any link needs the ICMP socket.
    pub fn uses_icmp(&self) -> bool {
        self.links.iter().any(|l| l.probe == ProbeMethod::Icmp)
    }
}

/// A monitored endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LinkConfig {
    /// Unique link name, used in events and the log.
    pub name: String,

    /// IP address or hostname to probe.
    pub address: String,

    /// Probe method (default: icmp).
    #[serde(default)]
    pub probe: ProbeMethod,

    /// Port for tcp probes.
    #[serde(default)]
    pub port: Option<u16>,
}

impl LinkConfig {
    pub fn icmp(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            probe: ProbeMethod::Icmp,
            port: None,
        }
    }

    pub fn tcp(name: impl Into<String>, address: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            probe: ProbeMethod::Tcp,
            port: Some(port),
        }
    }

    pub fn target(&self) -> ProbeTarget {
        ProbeTarget {
            address: self.address.clone(),
            method: self.probe,
            port: self.port,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Diagnostic log format.
    pub log_format: LogFormat,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
