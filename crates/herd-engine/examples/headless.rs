//! Headless herd run: build a world, tick it, print herd statistics.
//!
//! Demonstrates:
//!   1. Building a `SimConfig` and `Simulation`
//!   2. Routing diagnostics through `LogSink` and `env_logger`
//!   3. Ticking synchronously and reading snapshots
//!   4. Handing the simulation to a `RealtimeDriver` and taking it back
//!
//! Run with:
//!   RUST_LOG=info cargo run --example headless

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use herd_core::LogSink;
use herd_engine::{RealtimeDriver, SimConfig, Simulation};

// ─── World parameters ───────────────────────────────────────────

const POPULATION: usize = 500;
const LEADER_RATIO: f64 = 0.02;
const WORLD: f64 = 2000.0;
const TICKS: u64 = 500;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = SimConfig {
        housekeeping_interval: 25,
        ..SimConfig::with_world(POPULATION, LEADER_RATIO, WORLD, WORLD, 40, 40, 7)
    };
    let mut sim = Simulation::with_sink(config, Arc::new(LogSink))?;
    let s = sim.summary();
    println!(
        "{} agents ({} leaders, {} followers), {} of {} cells impassable, {} workers",
        s.agents, s.leaders, s.followers, s.impassable_cells, s.terrain_cells, s.workers
    );
    println!(
        "terrain patches: {} water, {} sand",
        s.patches.impassable, s.patches.soft
    );

    let mut relocations = 0;
    let mut total_us = 0;
    for _ in 0..TICKS {
        let report = sim.run_tick()?;
        relocations += report.metrics.relocations;
        total_us += report.metrics.total_us;
    }
    println!(
        "{TICKS} ticks, mean {:.1} us/tick, {relocations} terrain relocations",
        total_us as f64 / TICKS as f64
    );

    let mut herds: HashMap<u16, usize> = HashMap::new();
    for a in sim.snapshot_agents() {
        if let Some(c) = a.color {
            *herds.entry(c.hue).or_default() += 1;
        }
    }
    let mut sizes: Vec<usize> = herds.into_values().collect();
    sizes.sort_unstable_by(|a, b| b.cmp(a));
    println!("herd sizes by colour: {sizes:?}");

    // ─── Realtime ───────────────────────────────────────────────

    sim.set_tick_interval_hint(5)?;
    let driver = RealtimeDriver::start(sim)?;
    std::thread::sleep(Duration::from_millis(200));
    let frame = driver.latest();
    println!("realtime driver reached tick {}", frame.tick);
    let sim = driver
        .stop()
        .ok_or("realtime driver thread panicked")?;
    println!("stopped at tick {}", sim.current_tick());
    Ok(())
}
