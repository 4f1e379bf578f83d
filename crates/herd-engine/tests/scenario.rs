//! Integration test: the reference 100-agent scenario.
//!
//! 100 agents, 4 leaders, a 1000x1000 world and two workers, run for
//! 1000 ticks. Every tick the committed state must satisfy the bounds,
//! role and reachability invariants; by the end every leader must have
//! both travelled and rested.

use std::collections::{HashMap, HashSet};

use herd_behavior::StateLabel;
use herd_core::{AgentId, Point};
use herd_engine::{SimConfig, Simulation};
use herd_test_utils::fixtures::scenario_params;
use herd_test_utils::{check_all, orphan_count};

fn scenario_config() -> SimConfig {
    SimConfig {
        behavior: scenario_params(),
        worker_count: Some(2),
        housekeeping_interval: 20,
        housekeeping_batch_size: 25,
        radius: (5.0, 8.0),
        ..SimConfig::with_world(100, 0.04, 1000.0, 1000.0, 20, 20, 2024)
    }
}

#[test]
fn thousand_ticks_keep_every_invariant() {
    let mut sim = Simulation::new(scenario_config()).unwrap();
    let summary = sim.summary();
    assert_eq!(summary.leaders, 4);
    assert_eq!(summary.followers, 96);
    assert_eq!(summary.workers, 2);

    let bounds = *sim.engine().terrain().bounds();
    let mut leader_states: HashMap<AgentId, HashSet<StateLabel>> = HashMap::new();

    for _ in 0..1000 {
        let report = sim.run_tick().unwrap();
        assert_eq!(report.metrics.tasks, 2);
        check_all(sim.engine().store(), &bounds).unwrap();
        for a in sim.snapshot_agents() {
            assert!(a.x.is_finite() && a.y.is_finite());
            if a.is_leader {
                leader_states.entry(a.id).or_default().insert(a.state);
            }
        }
    }

    assert_eq!(sim.current_tick().0, 1000);
    assert_eq!(leader_states.len(), 4);
    for (id, seen) in &leader_states {
        assert!(seen.contains(&StateLabel::Traveling), "leader {id} never travelled");
        assert!(seen.contains(&StateLabel::Resting), "leader {id} never rested");
    }
}

#[test]
fn injected_orphan_is_repaired_by_the_sweep() {
    let mut sim = Simulation::new(scenario_config()).unwrap();
    for _ in 0..10 {
        sim.run_tick().unwrap();
    }
    let victim = AgentId(50);
    assert!(sim.clear_leader(victim).unwrap().is_some());
    assert_eq!(orphan_count(sim.engine().store()), 1);

    let report = sim.run_tick().unwrap();
    assert_eq!(report.metrics.orphans_swept, 1);
    assert_eq!(orphan_count(sim.engine().store()), 0);
    let snap = sim.snapshot_agents();
    let a = snap.iter().find(|a| a.id == victim).unwrap();
    assert!(a.color.is_some());
}

#[test]
fn injected_orphan_is_repaired_within_one_housekeeping_interval() {
    let mut config = scenario_config();
    config.per_tick_sweep = false;
    config.housekeeping_batch_size = 100;
    let interval = config.housekeeping_interval;
    let mut sim = Simulation::new(config).unwrap();

    sim.clear_leader(AgentId(77)).unwrap();
    let mut repaired_at = None;
    for t in 1..=interval {
        sim.run_tick().unwrap();
        if orphan_count(sim.engine().store()) == 0 {
            repaired_at = Some(t);
            break;
        }
    }
    assert_eq!(repaired_at, Some(interval));
    assert_eq!(sim.last_metrics().orphans_rehomed, 1);
}

#[test]
fn snapshots_between_ticks_are_identical() {
    let mut sim = Simulation::new(scenario_config()).unwrap();
    for _ in 0..25 {
        sim.run_tick().unwrap();
    }
    let first = sim.snapshot_agents();
    let second = sim.snapshot_agents();
    assert_eq!(first, second);
    assert_eq!(first.len(), 100);
}

#[test]
fn identical_runs_agree() {
    let mut a = Simulation::new(scenario_config()).unwrap();
    let mut b = Simulation::new(scenario_config()).unwrap();
    for _ in 0..200 {
        a.run_tick().unwrap();
        b.run_tick().unwrap();
    }
    assert_eq!(a.snapshot_agents(), b.snapshot_agents());
}

#[test]
fn leaders_move_on_the_first_tick() {
    let mut config = scenario_config();
    config.terrain_patches = 0;
    let mut sim = Simulation::new(config).unwrap();
    let before: HashMap<AgentId, Point> = sim
        .snapshot_agents()
        .into_iter()
        .filter(|a| a.is_leader)
        .map(|a| (a.id, Point::new(a.x, a.y)))
        .collect();
    assert_eq!(before.len(), 4);

    sim.run_tick().unwrap();
    for a in sim.snapshot_agents().into_iter().filter(|a| a.is_leader) {
        let moved = Point::new(a.x, a.y).distance(before[&a.id]);
        assert!(moved > 0.0, "leader {} did not move", a.id);
        assert!(moved <= 5.0 + 1e-9, "leader {} moved {moved}", a.id);
    }
}
