//! Cycle runner driving the tracker at a fixed cadence.

use std::num::NonZeroU32;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::time::{self, Instant};

use crate::config::validation::ValidationError;
use crate::config::{ConfigError, MonitorConfig};
use crate::lifecycle::ShutdownListener;
use crate::observability::metrics;
use crate::probe::{classify_probe, ProbeError, ProbeResult, Prober};
use crate::sink::EventSink;
use crate::tracker::{LinkTracker, StateChangeEvent};

/// Build a tracker holding one link per configured endpoint.
pub fn build_tracker(config: &MonitorConfig) -> Result<LinkTracker, ConfigError> {
    let threshold = NonZeroU32::new(config.threshold)
        .ok_or_else(|| ConfigError::Validation(vec![ValidationError::ZeroThreshold]))?;

    let mut tracker = LinkTracker::new(threshold);
    for link in &config.links {
        tracker
            .add_link(link.name.clone(), link.target())
            .ok_or_else(|| {
                ConfigError::Validation(vec![ValidationError::DuplicateName(link.name.clone())])
            })?;
    }
    Ok(tracker)
}

/// Summary of one monitoring cycle.
#[derive(Debug, Clone, Default)]
pub struct CycleReport {
    /// Number of links probed.
    pub probed: usize,
    /// Probes classified as failures.
    pub failures: usize,
    /// Events emitted, in emission order.
    pub events: Vec<StateChangeEvent>,
    /// Events the sink failed to record.
    pub sink_errors: usize,
}

/// Probes every link once per interval and forwards transitions to a sink.
pub struct CycleRunner<P, S> {
    tracker: LinkTracker,
    prober: P,
    sink: S,
    interval: Duration,
    timeout: Duration,
}

impl<P: Prober, S: EventSink> CycleRunner<P, S> {
    pub fn new(tracker: LinkTracker, prober: P, sink: S, interval: Duration, timeout: Duration) -> Self {
        Self {
            tracker,
            prober,
            sink,
            interval,
            timeout,
        }
    }

    pub fn tracker(&self) -> &LinkTracker {
        &self.tracker
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Run one cycle: probe all links, update the tracker, record events.
    pub async fn run_cycle(&mut self) -> CycleReport {
        let started = Instant::now();
        let timeout = self.timeout;
        let prober = &self.prober;

        let results: Vec<ProbeResult> = join_all(self.tracker.links().iter().map(|link| async move {
            match time::timeout(timeout, prober.probe(link.target(), timeout)).await {
                Ok(result) => result,
                Err(_) => ProbeResult::Error(ProbeError::Timeout(timeout)),
            }
        }))
        .await;

        let mut report = CycleReport {
            probed: results.len(),
            ..CycleReport::default()
        };

        let ids: Vec<_> = self.tracker.ids().collect();
        for (id, result) in ids.into_iter().zip(results) {
            let Some(name) = self.tracker.link(id).map(|link| link.name().to_string()) else {
                continue;
            };
            if let ProbeResult::Error(e) = &result {
                tracing::debug!(link = %name, error = %e, "Probe error");
            }

            let outcome = classify_probe(&result);
            metrics::record_probe(&name, outcome);
            if !outcome.is_success() {
                report.failures += 1;
            }

            let Some(event) = self.tracker.record_outcome(id, outcome) else {
                continue;
            };

            metrics::record_transition(&event);
            tracing::info!(link = %event.link, status = %event.status, "Link state changed");

            if let Err(e) = self.sink.record(&event) {
                // The transition stands; re-emitting it later would duplicate it.
                metrics::record_sink_error();
                report.sink_errors += 1;
                tracing::error!(link = %event.link, status = %event.status, error = %e, "Failed to record event");
            }
            report.events.push(event);
        }

        tracing::debug!(
            probed = report.probed,
            failures = report.failures,
            events = report.events.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Cycle complete"
        );
        report
    }

    /// Run cycles until the shutdown signal fires. The first cycle starts
    /// immediately; each later one starts `interval` after the previous ended.
    pub async fn run(&mut self, mut shutdown: ShutdownListener) {
        tracing::info!(
            links = self.tracker.len(),
            interval_secs = self.interval.as_secs_f64(),
            timeout_secs = self.timeout.as_secs_f64(),
            threshold = self.tracker.threshold().get(),
            "Monitoring started"
        );

        while !shutdown.is_triggered() {
            // Cancellation can only land while probes are in flight; tracker
            // updates and sink writes run without yielding.
            tokio::select! {
                biased;
                _ = shutdown.recv() => break,
                _ = self.run_cycle() => {}
            }

            // The full interval elapses between the end of one cycle and the
            // start of the next, however long the probes took.
            tokio::select! {
                biased;
                _ = shutdown.recv() => break,
                _ = time::sleep(self.interval) => {}
            }
        }

        tracing::info!("Monitor received shutdown signal, exiting loop");
    }
}
