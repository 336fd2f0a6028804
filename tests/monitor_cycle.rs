//! End-to-end tests of the monitoring cycle with scripted probes.

use std::time::Duration;

use noc_monitor::lifecycle::Shutdown;
use noc_monitor::monitor::{build_tracker, CycleRunner};
use noc_monitor::probe::{NetworkProber, ProbeError, ProbeResult};
use noc_monitor::sink::{read_history, FanoutSink, LogFileSink};
use noc_monitor::tracker::{LinkState, Status};

mod common;
use common::{config, FailingSink, MemorySink, ScriptedProber};

const CORE: &str = "8.8.8.8";
const BACKHAUL: &str = "1.1.1.1";
const AGGREGATION: &str = "10.100.152.21";

fn runner(
    threshold: u32,
    prober: ScriptedProber,
) -> (CycleRunner<ScriptedProber, MemorySink>, MemorySink) {
    let config = config(
        threshold,
        &[("Core", CORE), ("Backhaul", BACKHAUL), ("Aggregation", AGGREGATION)],
    );
    let sink = MemorySink::default();
    let runner = CycleRunner::new(
        build_tracker(&config).unwrap(),
        prober,
        sink.clone(),
        config.interval(),
        config.timeout(),
    );
    (runner, sink)
}

async fn run_cycles(runner: &mut CycleRunner<ScriptedProber, MemorySink>, n: usize) -> Vec<usize> {
    let mut per_cycle = Vec::new();
    for _ in 0..n {
        per_cycle.push(runner.run_cycle().await.events.len());
    }
    per_cycle
}

#[tokio::test]
async fn core_goes_down_after_three_failures() {
    let prober = ScriptedProber::new()
        .script(CORE, &[false, false, false])
        .script(BACKHAUL, &[true, true, true])
        .script(AGGREGATION, &[true, false, true]);
    let (mut runner, sink) = runner(3, prober);

    let per_cycle = run_cycles(&mut runner, 3).await;

    assert_eq!(per_cycle, vec![0, 0, 2]);
    assert_eq!(
        sink.summary(),
        vec![("Core".into(), "DOWN".into()), ("Backhaul".into(), "UP".into())]
    );
    let aggregation = runner.tracker().link(runner.tracker().link_id("Aggregation").unwrap()).unwrap();
    assert_eq!(aggregation.state(), LinkState::Unknown);
}

#[tokio::test]
async fn partial_recovery_emits_no_up() {
    let prober = ScriptedProber::new().script(CORE, &[false, false, false, true, true]);
    let (mut runner, sink) = runner(3, prober);

    run_cycles(&mut runner, 5).await;

    let core: Vec<_> = sink.summary().into_iter().filter(|(l, _)| l == "Core").collect();
    assert_eq!(core, vec![("Core".into(), "DOWN".into())]);
}

#[tokio::test]
async fn down_and_up_with_threshold_two() {
    let prober = ScriptedProber::new()
        .script(CORE, &[false, false, true, true])
        .script(BACKHAUL, &[false, true, false, true])
        .script(AGGREGATION, &[true, false, true, false]);
    let (mut runner, sink) = runner(2, prober);

    let per_cycle = run_cycles(&mut runner, 4).await;

    assert_eq!(per_cycle, vec![0, 1, 0, 1]);
    assert_eq!(
        sink.summary(),
        vec![("Core".into(), "DOWN".into()), ("Core".into(), "UP".into())]
    );
}

#[tokio::test]
async fn probe_errors_count_as_failures() {
    let prober = ScriptedProber::new().script_results(
        CORE,
        vec![
            ProbeResult::Error(ProbeError::Timeout(Duration::from_secs(2))),
            ProbeResult::Error(ProbeError::Resolve("core.invalid".into())),
            ProbeResult::Unreachable,
        ],
    );
    let (mut runner, sink) = runner(3, prober);

    let reports = [
        runner.run_cycle().await,
        runner.run_cycle().await,
        runner.run_cycle().await,
    ];

    assert!(reports.iter().all(|r| r.probed == 3));
    assert_eq!(reports[2].events.len(), 3);
    assert!(sink.events().iter().all(|e| e.status == Status::Down));
}

#[tokio::test]
async fn sink_failure_does_not_stop_monitoring() {
    let config = config(1, &[("Core", CORE)]);
    let prober = ScriptedProber::new().script(CORE, &[false, true, true]);
    let mut runner = CycleRunner::new(
        build_tracker(&config).unwrap(),
        prober,
        FailingSink,
        config.interval(),
        config.timeout(),
    );

    let first = runner.run_cycle().await;
    assert_eq!(first.sink_errors, 1);
    assert_eq!(first.events[0].status, Status::Down);

    // The failed write still counts as delivered; the next transition is Up.
    let second = runner.run_cycle().await;
    assert_eq!(second.events.len(), 1);
    assert_eq!(second.events[0].status, Status::Up);

    let third = runner.run_cycle().await;
    assert!(third.events.is_empty());
}

#[tokio::test(start_paused = true)]
async fn slow_probe_is_cut_off_at_its_timeout() {
    let prober = ScriptedProber::new()
        .script(CORE, &[true])
        .delay(CORE, Duration::from_secs(30))
        .script(BACKHAUL, &[true]);
    let (mut runner, _sink) = runner(1, prober);

    let start = tokio::time::Instant::now();
    let report = runner.run_cycle().await;
    let elapsed = start.elapsed();

    assert!(elapsed >= Duration::from_secs(2), "elapsed {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(3), "elapsed {:?}", elapsed);

    let tracker = runner.tracker();
    assert_eq!(tracker.link(tracker.link_id("Core").unwrap()).unwrap().state(), LinkState::Down);
    assert_eq!(tracker.link(tracker.link_id("Backhaul").unwrap()).unwrap().state(), LinkState::Up);
    assert_eq!(report.failures, 2);
}

#[tokio::test(start_paused = true)]
async fn run_loop_stops_on_shutdown() {
    let prober = ScriptedProber::new()
        .script(CORE, &[false; 10])
        .script(BACKHAUL, &[true; 10])
        .script(AGGREGATION, &[true; 10]);
    let (mut runner, sink) = runner(3, prober);

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    let handle = tokio::spawn(async move {
        runner.run(rx).await;
        runner
    });

    // Probes return at once, so cycles start at 0s, 5s and 10s.
    tokio::time::sleep(Duration::from_secs(12)).await;
    shutdown.trigger();
    let runner = handle.await.unwrap();

    assert_eq!(
        sink.summary(),
        vec![
            ("Core".into(), "DOWN".into()),
            ("Backhaul".into(), "UP".into()),
            ("Aggregation".into(), "UP".into()),
        ]
    );
    let core = runner.tracker().link(runner.tracker().link_id("Core").unwrap()).unwrap();
    assert_eq!(core.consecutive_failures(), 3);
}

/// Run a single slow link for `run_for` seconds and return the second
/// offsets at which its probes started.
async fn cycle_starts(interval_secs: u64, timeout_secs: u64, probe_secs: u64, run_for: u64) -> Vec<u64> {
    let mut config = config(3, &[("Core", CORE)]);
    config.interval_secs = interval_secs;
    config.timeout_secs = timeout_secs;

    let prober = ScriptedProber::new()
        .script(CORE, &[true; 10])
        .delay(CORE, Duration::from_secs(probe_secs));
    let starts = prober.start_log();
    let mut runner = CycleRunner::new(
        build_tracker(&config).unwrap(),
        prober,
        MemorySink::default(),
        config.interval(),
        config.timeout(),
    );

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    let origin = tokio::time::Instant::now();
    let handle = tokio::spawn(async move { runner.run(rx).await });

    tokio::time::sleep(Duration::from_secs(run_for)).await;
    shutdown.trigger();
    handle.await.unwrap();

    let offsets: Vec<u64> = starts
        .lock()
        .unwrap()
        .iter()
        .map(|(_, at)| (*at - origin).as_secs())
        .collect();
    offsets
}

#[tokio::test(start_paused = true)]
async fn interval_is_waited_after_each_cycle() {
    // 2s of probing plus a 5s wait.
    assert_eq!(cycle_starts(5, 3, 2, 15).await, vec![0, 7, 14]);
}

#[tokio::test(start_paused = true)]
async fn timeout_longer_than_interval_still_waits() {
    // 3s of probing plus a 1s wait; cycles never run back to back.
    assert_eq!(cycle_starts(1, 4, 3, 9).await, vec![0, 4, 8]);
}

#[tokio::test]
async fn icmp_links_go_down_when_socket_cannot_be_opened() {
    let config = config(2, &[("Core", CORE), ("Backhaul", BACKHAUL)]);
    let prober = NetworkProber::from_icmp_socket(Err(ProbeError::Socket(
        "Operation not permitted".into(),
    )));
    let sink = MemorySink::default();
    let mut runner = CycleRunner::new(
        build_tracker(&config).unwrap(),
        prober,
        sink.clone(),
        config.interval(),
        config.timeout(),
    );

    assert!(runner.run_cycle().await.events.is_empty());
    let report = runner.run_cycle().await;

    assert_eq!(report.failures, 2);
    assert_eq!(
        sink.summary(),
        vec![("Core".into(), "DOWN".into()), ("Backhaul".into(), "DOWN".into())]
    );
}

#[tokio::test]
async fn every_event_lands_in_the_log_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("log.txt");
    let mut config = config(2, &[("Core", CORE), ("Backhaul", BACKHAUL)]);
    config.log_file = log.clone();

    let prober = ScriptedProber::new()
        .script(CORE, &[false, false, true, true, false, false])
        .script(BACKHAUL, &[true, true, true, false, false, false]);
    let memory = MemorySink::default();
    let mut runner = CycleRunner::new(
        build_tracker(&config).unwrap(),
        prober,
        FanoutSink::new()
            .with(LogFileSink::new(&config.log_file))
            .with(memory.clone()),
        config.interval(),
        config.timeout(),
    );

    for _ in 0..6 {
        runner.run_cycle().await;
    }

    let emitted = memory.events();
    let history = read_history(&log).unwrap();
    assert_eq!(emitted.len(), 5);
    assert_eq!(history.len(), emitted.len());
    for (record, event) in history.iter().zip(&emitted) {
        assert_eq!(record.link, event.link);
        assert_eq!(record.status, event.status);
    }
    let statuses: Vec<_> = history.iter().map(|r| (r.link.as_str(), r.status)).collect();
    assert_eq!(
        statuses,
        vec![
            ("Core", Status::Down),
            ("Backhaul", Status::Up),
            ("Core", Status::Up),
            ("Backhaul", Status::Down),
            ("Core", Status::Down),
        ]
    );
}
