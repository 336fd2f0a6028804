//! ICMP echo probe.

use std::net::IpAddr;
use std::time::Duration;

use surge_ping::{Client, Config, PingIdentifier, PingSequence, SurgeError, ICMP};

use super::{ProbeError, ProbeResult, ProbeTarget};

const PAYLOAD: [u8; 56] = [0u8; 56];

/// Sends a single echo request per probe.
pub struct IcmpProber {
    v4: Client,
    v6: Option<Client>,
}

impl IcmpProber {
    /// Open the ICMP sockets. IPv6 is best effort.
    pub fn new() -> Result<Self, ProbeError> {
        let v4 = Client::new(&Config::default()).map_err(|e| ProbeError::Socket(e.to_string()))?;
        let v6 = match Client::new(&Config::builder().kind(ICMP::V6).build()) {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::debug!(error = %e, "ICMPv6 socket unavailable");
                None
            }
        };
        Ok(Self { v4, v6 })
    }

    pub async fn probe(&self, target: &ProbeTarget, timeout: Duration) -> ProbeResult {
        let ip = match resolve(&target.address).await {
            Ok(ip) => ip,
            Err(e) => return ProbeResult::Error(e),
        };

        let client = match (ip, &self.v6) {
            (IpAddr::V4(_), _) => &self.v4,
            (IpAddr::V6(_), Some(v6)) => v6,
            (IpAddr::V6(_), None) => {
                return ProbeResult::Error(ProbeError::Socket("no ICMPv6 socket".to_string()))
            }
        };

        let mut pinger = client.pinger(ip, PingIdentifier(rand::random())).await;
        pinger.timeout(timeout);

        match pinger.ping(PingSequence(0), &PAYLOAD).await {
            Ok((_, rtt)) => ProbeResult::Reachable { rtt },
            Err(SurgeError::Timeout { .. }) => ProbeResult::Unreachable,
            Err(e) => ProbeResult::Error(ProbeError::Transport(e.to_string())),
        }
    }
}

/// Resolve a literal IP or hostname to the first address returned.
pub(crate) async fn resolve(address: &str) -> Result<IpAddr, ProbeError> {
    if let Ok(ip) = address.parse::<IpAddr>() {
        return Ok(ip);
    }
    let mut addrs = tokio::net::lookup_host((address, 0))
        .await
        .map_err(|e| ProbeError::Resolve(format!("{}: {}", address, e)))?;
    addrs
        .next()
        .map(|addr| addr.ip())
        .ok_or_else(|| ProbeError::Resolve(format!("{}: no addresses found", address)))
}
