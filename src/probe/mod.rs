//! Reachability probing.
//!
//! # Data Flow
//! ```text
//! CycleRunner
//!     → Prober::probe(target, timeout)
//!         → icmp.rs (echo request via surge-ping)
//!         → tcp.rs  (TCP connect)
//!     → ProbeResult { Reachable | Unreachable | Error }
//!     → classify_probe() → ProbeOutcome { Success | Failure }
//!     → LinkTracker
//! ```
//!
//! # Design Decisions
//! - Probers are stateless; every probe is bounded by its own timeout
//! - Errors never escape this module as anything but `ProbeResult::Error`
//! - Classification is deliberately coarse: anything other than a reply is a failure

pub mod icmp;
pub mod tcp;

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Method used to check a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeMethod {
    /// ICMP echo request.
    #[default]
    Icmp,
    /// TCP connect to a fixed port.
    Tcp,
}

/// What a prober needs to know to check a single link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTarget {
    pub address: String,
    pub method: ProbeMethod,
    /// Destination port for `ProbeMethod::Tcp`.
    pub port: Option<u16>,
}

impl ProbeTarget {
    pub fn icmp(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            method: ProbeMethod::Icmp,
            port: None,
        }
    }

    pub fn tcp(address: impl Into<String>, port: u16) -> Self {
        Self {
            address: address.into(),
            method: ProbeMethod::Tcp,
            port: Some(port),
        }
    }
}

impl std::fmt::Display for ProbeTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.method, self.port) {
            (ProbeMethod::Tcp, Some(port)) => write!(f, "tcp://{}:{}", self.address, port),
            (ProbeMethod::Tcp, None) => write!(f, "tcp://{}", self.address),
            (ProbeMethod::Icmp, _) => write!(f, "icmp://{}", self.address),
        }
    }
}

/// Reasons a probe could not determine reachability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// No reply within the probe budget.
    #[error("probe timed out after {0:?}")]
    Timeout(Duration),

    /// Hostname could not be resolved.
    #[error("address resolution failed: {0}")]
    Resolve(String),

    /// The probe was sent but failed in transit.
    #[error("transport error: {0}")]
    Transport(String),

    /// A local socket could not be created.
    #[error("socket error: {0}")]
    Socket(String),

    /// Target is missing information required by its probe method.
    #[error("invalid probe target: {0}")]
    InvalidTarget(String),
}

/// Raw result of one probe attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeResult {
    /// The target answered.
    Reachable { rtt: Duration },
    /// The target explicitly refused or did not answer.
    Unreachable,
    /// Reachability could not be determined.
    Error(ProbeError),
}

/// Per-cycle input to the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Success,
    Failure,
}

impl ProbeOutcome {
    pub fn is_success(self) -> bool {
        self == ProbeOutcome::Success
    }
}

/// Collapse a probe result into the tracker's two-valued outcome.
///
/// Intentionally coarse: a timeout, a resolution failure and an explicit
/// rejection all count as `Failure`. Only a reply counts as `Success`.
pub fn classify_probe(result: &ProbeResult) -> ProbeOutcome {
    match result {
        ProbeResult::Reachable { .. } => ProbeOutcome::Success,
        ProbeResult::Unreachable | ProbeResult::Error(_) => ProbeOutcome::Failure,
    }
}

/// A reachability check against a single target.
///
/// Implementations must return within `timeout`; the cycle runner also wraps
/// each call in its own timeout so a misbehaving prober cannot stall a cycle.
pub trait Prober: Send + Sync {
    fn probe(
        &self,
        target: &ProbeTarget,
        timeout: Duration,
    ) -> impl Future<Output = ProbeResult> + Send;
}

/// Production prober dispatching on the target's probe method.
pub struct NetworkProber {
    icmp: Option<icmp::IcmpProber>,
    tcp: tcp::TcpProber,
}

impl NetworkProber {
    /// Create a prober. The ICMP socket is only opened when `with_icmp` is set,
    /// since it usually requires elevated privileges.
    pub fn new(with_icmp: bool) -> Self {
        if with_icmp {
            Self::from_icmp_socket(icmp::IcmpProber::new())
        } else {
            Self {
                icmp: None,
                tcp: tcp::TcpProber,
            }
        }
    }

    /// Build around the result of opening the ICMP socket.
    ///
    /// A socket that could not be opened is not fatal: ICMP probes then fail
    /// with `ProbeError::Socket` and their links go Down like any other
    /// unreachable link.
    pub fn from_icmp_socket(icmp: Result<icmp::IcmpProber, ProbeError>) -> Self {
        let icmp = match icmp {
            Ok(icmp) => Some(icmp),
            Err(e) => {
                tracing::warn!(error = %e, "ICMP socket unavailable; ICMP links will be reported as failing");
                None
            }
        };
        Self {
            icmp,
            tcp: tcp::TcpProber,
        }
    }
}

impl Prober for NetworkProber {
    async fn probe(&self, target: &ProbeTarget, timeout: Duration) -> ProbeResult {
        match target.method {
            ProbeMethod::Icmp => match &self.icmp {
                Some(icmp) => icmp.probe(target, timeout).await,
                None => ProbeResult::Error(ProbeError::Socket(
                    "ICMP prober not initialized".to_string(),
                )),
            },
            ProbeMethod::Tcp => self.tcp.probe(target, timeout).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_reachable_is_success() {
        let reachable = ProbeResult::Reachable { rtt: Duration::from_millis(12) };
        assert_eq!(classify_probe(&reachable), ProbeOutcome::Success);
        assert_eq!(classify_probe(&ProbeResult::Unreachable), ProbeOutcome::Failure);

        let errors = [
            ProbeError::Timeout(Duration::from_secs(2)),
            ProbeError::Resolve("no such host".into()),
            ProbeError::Transport("network unreachable".into()),
            ProbeError::Socket("permission denied".into()),
        ];
        for err in errors {
            assert_eq!(classify_probe(&ProbeResult::Error(err)), ProbeOutcome::Failure);
        }
    }

    #[test]
    fn target_display() {
        assert_eq!(ProbeTarget::icmp("8.8.8.8").to_string(), "icmp://8.8.8.8");
        assert_eq!(ProbeTarget::tcp("10.0.0.1", 22).to_string(), "tcp://10.0.0.1:22");
    }

    #[tokio::test]
    async fn icmp_without_socket_is_an_error() {
        let prober = NetworkProber::from_icmp_socket(Err(ProbeError::Socket("permission denied".into())));
        let result = prober
            .probe(&ProbeTarget::icmp("127.0.0.1"), Duration::from_millis(100))
            .await;
        assert!(matches!(result, ProbeResult::Error(ProbeError::Socket(_))));
    }
}
