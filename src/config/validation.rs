//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (interval, threshold, timeout > 0)
//! - Enforce unique link names that survive the log format
//! - Check the metrics address parses, whether or not metrics are enabled
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: MonitorConfig → Result<(), Vec<ValidationError>>
//! - A timeout longer than the interval is allowed (warned about at startup)

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::MonitorConfig;
use crate::probe::ProbeMethod;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no links configured")]
    NoLinks,

    #[error("link #{0} has an empty name")]
    EmptyName(usize),

    #[error("link name '{0}' contains a comma or line break")]
    UnloggableName(String),

    #[error("duplicate link name '{0}'")]
    DuplicateName(String),

    #[error("link '{0}' has an empty address")]
    EmptyAddress(String),

    #[error("link '{0}' uses tcp probing but has no port")]
    MissingPort(String),

    #[error("interval_secs must be positive")]
    ZeroInterval,

    #[error("threshold must be at least 1")]
    ZeroThreshold,

    #[error("timeout_secs must be positive")]
    ZeroTimeout,

    #[error("metrics_address '{0}' is not a valid socket address")]
    InvalidMetricsAddress(String),
}

/// Check a parsed configuration.
pub fn validate_config(config: &MonitorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.links.is_empty() {
        errors.push(ValidationError::NoLinks);
    }

    let mut seen = HashSet::new();
    for (index, link) in config.links.iter().enumerate() {
        if link.name.trim().is_empty() {
            errors.push(ValidationError::EmptyName(index + 1));
        } else if link.name.contains([',', '\n', '\r']) {
            errors.push(ValidationError::UnloggableName(link.name.clone()));
        } else if !seen.insert(link.name.as_str()) {
            errors.push(ValidationError::DuplicateName(link.name.clone()));
        }

        if link.address.trim().is_empty() {
            errors.push(ValidationError::EmptyAddress(link.name.clone()));
        }
        if link.probe == ProbeMethod::Tcp && link.port.is_none() {
            errors.push(ValidationError::MissingPort(link.name.clone()));
        }
    }

    if config.interval_secs == 0 {
        errors.push(ValidationError::ZeroInterval);
    }
    if config.threshold == 0 {
        errors.push(ValidationError::ZeroThreshold);
    }
    if config.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    let metrics_address = &config.observability.metrics_address;
    if metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidMetricsAddress(metrics_address.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
