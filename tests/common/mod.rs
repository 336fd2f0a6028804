//! Shared utilities for integration testing.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;

use noc_monitor::config::{LinkConfig, MonitorConfig};
use noc_monitor::probe::{ProbeResult, ProbeTarget, Prober};
use noc_monitor::sink::{EventSink, SinkError};
use noc_monitor::StateChangeEvent;

/// Prober replaying a fixed script of results per address.
///
/// Once a script runs dry every further probe is `Unreachable`.
#[derive(Default)]
pub struct ScriptedProber {
    scripts: Mutex<HashMap<String, VecDeque<ProbeResult>>>,
    delays: HashMap<String, Duration>,
    started: Arc<Mutex<Vec<(String, Instant)>>>,
}

#[allow(dead_code)]
impl ScriptedProber {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a sequence of success (`true`) / failure (`false`) replies.
    pub fn script(self, address: &str, replies: &[bool]) -> Self {
        let results = replies
            .iter()
            .map(|up| {
                if *up {
                    ProbeResult::Reachable { rtt: Duration::from_millis(5) }
                } else {
                    ProbeResult::Unreachable
                }
            })
            .collect();
        self.script_results(address, results)
    }

    pub fn script_results(self, address: &str, results: Vec<ProbeResult>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(address.to_string(), results.into());
        self
    }

    /// Shared log of `(address, start time)` for every probe issued.
    pub fn start_log(&self) -> Arc<Mutex<Vec<(String, Instant)>>> {
        self.started.clone()
    }

    /// Make every probe of `address` take `delay`.
    pub fn delay(mut self, address: &str, delay: Duration) -> Self {
        self.delays.insert(address.to_string(), delay);
        self
    }
}

impl Prober for ScriptedProber {
    async fn probe(&self, target: &ProbeTarget, _timeout: Duration) -> ProbeResult {
        self.started
            .lock()
            .unwrap()
            .push((target.address.clone(), Instant::now()));
        let next = {
            let mut scripts = self.scripts.lock().unwrap();
            scripts
                .get_mut(&target.address)
                .and_then(|script| script.pop_front())
                .unwrap_or(ProbeResult::Unreachable)
        };
        if let Some(delay) = self.delays.get(&target.address) {
            tokio::time::sleep(*delay).await;
        }
        next
    }
}

/// Sink keeping events in memory, shared between clones.
#[derive(Clone, Default)]
pub struct MemorySink {
    events: Arc<Mutex<Vec<StateChangeEvent>>>,
}

#[allow(dead_code)]
impl MemorySink {
    pub fn events(&self) -> Vec<StateChangeEvent> {
        self.events.lock().unwrap().clone()
    }

    /// `(link, "UP"|"DOWN")` pairs in recorded order.
    pub fn summary(&self) -> Vec<(String, String)> {
        self.events()
            .iter()
            .map(|e| (e.link.clone(), e.status.to_string()))
            .collect()
    }
}

impl EventSink for MemorySink {
    fn record(&mut self, event: &StateChangeEvent) -> Result<(), SinkError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// Sink failing every write, as a full disk would.
#[allow(dead_code)]
pub struct FailingSink;

impl EventSink for FailingSink {
    fn record(&mut self, _event: &StateChangeEvent) -> Result<(), SinkError> {
        Err(SinkError::Io {
            sink: "log file",
            source: std::io::Error::new(std::io::ErrorKind::Other, "No space left on device"),
        })
    }
}

/// Config with ICMP links named after their addresses' roles.
#[allow(dead_code)]
pub fn config(threshold: u32, links: &[(&str, &str)]) -> MonitorConfig {
    MonitorConfig {
        links: links
            .iter()
            .map(|(name, address)| LinkConfig::icmp(*name, *address))
            .collect(),
        threshold,
        interval_secs: 5,
        timeout_secs: 2,
        ..MonitorConfig::default()
    }
}
