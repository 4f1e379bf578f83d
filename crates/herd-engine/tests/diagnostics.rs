//! Integration test: diagnostic sink wiring and failure handling.

use std::sync::Arc;

use herd_core::{null_sink, LogSink};
use herd_engine::{SimConfig, Simulation, TickError};
use herd_test_utils::fixtures::{scenario_params, PanicBehavior};
use herd_test_utils::RecordingSink;

fn config() -> SimConfig {
    SimConfig {
        behavior: scenario_params(),
        worker_count: Some(3),
        housekeeping_interval: 5,
        ..SimConfig::with_world(60, 0.05, 800.0, 600.0, 8, 6, 17)
    }
}

#[test]
fn every_task_reports_start_and_finish() {
    let sink = RecordingSink::new();
    let mut sim = Simulation::with_sink(config(), sink.clone()).unwrap();
    for _ in 0..5 {
        sim.run_tick().unwrap();
    }
    assert_eq!(sink.count_containing(" start: agents "), 15);
    assert_eq!(sink.count_containing(" finish: "), 15);
    assert_eq!(sink.count_containing("housekeeping:"), 1);

    let lines = sink.lines();
    assert_eq!(lines.len(), 31);
    assert!(lines
        .iter()
        .any(|l| l.starts_with("tick 1 task 0 start: agents 0..20")));
}

#[test]
fn results_do_not_depend_on_the_sink() {
    let mut quiet = Simulation::with_sink(config(), null_sink()).unwrap();
    let mut recorded = Simulation::with_sink(config(), RecordingSink::new()).unwrap();
    let mut logged = Simulation::with_sink(config(), Arc::new(LogSink)).unwrap();
    for _ in 0..100 {
        quiet.run_tick().unwrap();
        recorded.run_tick().unwrap();
        logged.run_tick().unwrap();
    }
    assert_eq!(quiet.snapshot_agents(), recorded.snapshot_agents());
    assert_eq!(quiet.snapshot_agents(), logged.snapshot_agents());
}

#[test]
fn throttled_ticks_still_commit() {
    let mut sim = Simulation::new(config()).unwrap();
    sim.set_core_utilization_target(96).unwrap();
    let report = sim.run_tick().unwrap();
    assert_eq!(report.tick.0, 1);
    assert!(report.metrics.parallel_us >= 2_000);
    assert!(report.metrics.slowest_task_us >= 2_000);
    assert!(report.metrics.slowest_task_us <= report.metrics.parallel_us);
}

#[test]
fn a_dead_worker_stops_the_simulation() {
    let sink = RecordingSink::new();
    let mut sim =
        Simulation::with_behavior(config(), Arc::new(PanicBehavior), sink.clone()).unwrap();
    assert!(matches!(sim.run_tick(), Err(TickError::WorkerLost { .. })));
    assert_eq!(sim.run_tick(), Err(TickError::TickDisabled));
    assert_eq!(sink.count_containing("tick failed"), 1);
}
