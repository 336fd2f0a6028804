//! TCP connect probe.
//!
//! Used where raw ICMP sockets are not permitted. A completed handshake is
//! `Reachable`, a refused connection is `Unreachable`.

use std::io::ErrorKind;
use std::time::{Duration, Instant};

use tokio::net::TcpStream;

use super::icmp::resolve;
use super::{ProbeError, ProbeResult, ProbeTarget};

#[derive(Debug, Clone, Copy, Default)]
pub struct TcpProber;

impl TcpProber {
    pub async fn probe(&self, target: &ProbeTarget, timeout: Duration) -> ProbeResult {
        let Some(port) = target.port else {
            return ProbeResult::Error(ProbeError::InvalidTarget(format!(
                "{} has no port",
                target.address
            )));
        };

        let ip = match resolve(&target.address).await {
            Ok(ip) => ip,
            Err(e) => return ProbeResult::Error(e),
        };

        let start = Instant::now();
        match tokio::time::timeout(timeout, TcpStream::connect((ip, port))).await {
            Ok(Ok(_)) => ProbeResult::Reachable { rtt: start.elapsed() },
            Ok(Err(e)) if e.kind() == ErrorKind::ConnectionRefused => ProbeResult::Unreachable,
            Ok(Err(e)) => ProbeResult::Error(ProbeError::Transport(e.to_string())),
            Err(_) => ProbeResult::Error(ProbeError::Timeout(timeout)),
        }
    }
}
