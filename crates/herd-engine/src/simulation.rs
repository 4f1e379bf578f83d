//! The user-facing simulation handle.
//!
//! [`Simulation`] wraps a [`TickEngine`] with the operations a frame
//! driver or renderer needs: build from a config, run one tick, take a
//! read-only snapshot of every agent, and adjust execution settings
//! between ticks.
//!
//! # Ownership model
//!
//! `Simulation` is [`Send`] but every method takes `&self` or
//! `&mut self`, so a snapshot can never be taken while a tick is
//! running and `run_tick()` can never be re-entered.

use std::sync::Arc;
use std::time::Duration;

use herd_arena::StoreError;
use herd_behavior::{Behavior, HerdBehavior, StateLabel};
use herd_core::{null_sink, AgentId, ConfigError, HerdColor, Point, SharedSink, TerrainType, TickId};

use crate::config::{validate_tick_interval, InitSummary, SimConfig};
use crate::metrics::TickMetrics;
use crate::tick::{TickEngine, TickError, TickReport};

// Compile-time assertion: Simulation can move to a driver thread.
const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send::<Simulation>();
    }
};

// ── AgentSnapshot ──────────────────────────────────────────────────

/// What a renderer needs to draw one agent.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentSnapshot {
    /// Agent id.
    pub id: AgentId,
    /// Committed x.
    pub x: f64,
    /// Committed y.
    pub y: f64,
    /// Leader or follower.
    pub is_leader: bool,
    /// Herd colour key; `None` for orphans.
    pub color: Option<HerdColor>,
    /// Current behaviour state.
    pub state: StateLabel,
}

// ── Simulation ─────────────────────────────────────────────────────

/// A running herd simulation.
///
/// # Example
///
/// ```ignore
/// let (mut sim, summary) = Simulation::initialize(100, 0.04, 1000.0, 1000.0, 10, 10, 7)?;
/// for _ in 0..1000 {
///     sim.run_tick()?;
/// }
/// let agents = sim.snapshot_agents();
/// ```
#[derive(Debug)]
pub struct Simulation {
    engine: TickEngine,
    config: SimConfig,
    summary: InitSummary,
}

impl Simulation {
    /// Build a simulation running [`HerdBehavior`] with no diagnostic sink.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        Self::with_sink(config, null_sink())
    }

    /// Build a simulation running [`HerdBehavior`], reporting to `sink`.
    pub fn with_sink(config: SimConfig, sink: SharedSink) -> Result<Self, ConfigError> {
        config.behavior.validate()?;
        let behavior = Arc::new(HerdBehavior::new(config.behavior.clone()));
        Self::with_behavior(config, behavior, sink)
    }

    /// Build a simulation running a custom behaviour.
    pub fn with_behavior(
        config: SimConfig,
        behavior: Arc<dyn Behavior>,
        sink: SharedSink,
    ) -> Result<Self, ConfigError> {
        let engine = TickEngine::new(&config, behavior, sink)?;
        let leaders = engine.leader_count();
        let summary = InitSummary {
            agents: engine.store().len(),
            leaders,
            followers: engine.store().len() - leaders,
            terrain_cells: engine.terrain().cell_count(),
            impassable_cells: engine.terrain().impassable_count(),
            patches: engine.patches(),
            workers: engine.worker_count(),
        };
        log::info!(
            "simulation ready: {} agents ({} leaders), {} terrain cells ({} impassable), {} workers, behaviour {}",
            summary.agents,
            summary.leaders,
            summary.terrain_cells,
            summary.impassable_cells,
            summary.workers,
            engine.behavior_name(),
        );
        Ok(Self {
            engine,
            config,
            summary,
        })
    }

    /// Build the world and population from the essential parameters,
    /// taking every other setting from [`SimConfig::default`].
    pub fn initialize(
        population: usize,
        leader_ratio: f64,
        world_width: f64,
        world_height: f64,
        terrain_cols: u32,
        terrain_rows: u32,
        seed: u64,
    ) -> Result<(Self, InitSummary), ConfigError> {
        let config = SimConfig::with_world(
            population,
            leader_ratio,
            world_width,
            world_height,
            terrain_cols,
            terrain_rows,
            seed,
        );
        let sim = Self::new(config)?;
        let summary = sim.summary;
        Ok((sim, summary))
    }

    /// Counts from construction.
    pub fn summary(&self) -> InitSummary {
        self.summary
    }

    /// Advance by one tick.
    pub fn run_tick(&mut self) -> Result<TickReport, TickError> {
        self.engine.execute_tick()
    }

    /// Read-only view of every live agent, in id order.
    pub fn snapshot_agents(&self) -> Vec<AgentSnapshot> {
        let store = self.engine.store();
        store
            .agents()
            .iter()
            .zip(store.motions())
            .filter(|(a, _)| a.exists())
            .map(|(a, m)| AgentSnapshot {
                id: a.id(),
                x: m.position.x,
                y: m.position.y,
                is_leader: a.is_leader(),
                color: a.color(),
                state: m.state.label(),
            })
            .collect()
    }

    /// Resize the worker pool. Takes effect on the next tick.
    pub fn set_worker_pool_size(&mut self, n: usize) -> Result<(), ConfigError> {
        self.engine.set_worker_count(n)?;
        self.config.worker_count = Some(n);
        Ok(())
    }

    /// Set the cadence a driver should tick at.
    pub fn set_tick_interval_hint(&mut self, ms: u64) -> Result<(), ConfigError> {
        validate_tick_interval(ms)?;
        self.config.tick_interval_ms = ms;
        Ok(())
    }

    /// Cadence a driver should tick at.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.config.tick_interval_ms)
    }

    /// Set the core utilisation target. Below 100 every task sleeps
    /// `(100 - pct) * 0.5` ms.
    pub fn set_core_utilization_target(&mut self, pct: u32) -> Result<(), ConfigError> {
        self.engine.set_core_utilization(pct)?;
        self.config.core_utilization_pct = pct;
        Ok(())
    }

    /// Turn the per-tick nearest-leader sweep on or off.
    pub fn set_per_tick_sweep(&mut self, enabled: bool) {
        self.engine.set_per_tick_sweep(enabled);
        self.config.per_tick_sweep = enabled;
    }

    /// Turn periodic housekeeping on or off.
    pub fn set_housekeeping_enabled(&mut self, enabled: bool) {
        self.engine.set_housekeeping_enabled(enabled);
        self.config.housekeeping_enabled = enabled;
    }

    /// Clear a follower's leader link, making it an orphan.
    pub fn clear_leader(&mut self, follower: AgentId) -> Result<Option<AgentId>, StoreError> {
        self.engine.store_mut().unlink(follower)
    }

    /// Soft-delete an agent.
    pub fn despawn(&mut self, id: AgentId) -> Result<(), StoreError> {
        self.engine.store_mut().despawn(id)
    }

    /// Put an agent at `p` (clamped) without running terrain checks.
    /// The next commit applies them.
    pub fn place_agent(&mut self, id: AgentId, p: Point) -> Result<(), StoreError> {
        let bounds = *self.engine.terrain().bounds();
        let store = self.engine.store_mut();
        let i = store.index_of(id).ok_or(StoreError::UnknownAgent(id))?;
        let m = store.motion_mut(i).ok_or(StoreError::UnknownAgent(id))?;
        let p = bounds.clamp(p);
        m.position = p;
        m.next = p;
        Ok(())
    }

    /// Overwrite one terrain cell. Returns false if out of the grid.
    pub fn set_terrain(&mut self, col: u32, row: u32, terrain: TerrainType) -> bool {
        self.engine.terrain_mut().set_cell(col, row, terrain)
    }

    /// Terrain at a world point.
    pub fn terrain_at(&self, p: Point) -> TerrainType {
        self.engine.terrain().terrain_at(p)
    }

    /// Last committed tick.
    pub fn current_tick(&self) -> TickId {
        self.engine.current_tick()
    }

    /// Metrics from the most recent tick.
    pub fn last_metrics(&self) -> &TickMetrics {
        self.engine.last_metrics()
    }

    /// The active configuration, setters applied.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// The underlying engine.
    pub fn engine(&self) -> &TickEngine {
        &self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> Simulation {
        let config = SimConfig {
            worker_count: Some(2),
            ..SimConfig::with_world(20, 0.1, 200.0, 200.0, 4, 4, 3)
        };
        Simulation::new(config).unwrap()
    }

    #[test]
    fn initialize_reports_counts() {
        let (sim, summary) = Simulation::initialize(100, 0.04, 1000.0, 1000.0, 10, 10, 1).unwrap();
        assert_eq!(summary.agents, 100);
        assert_eq!(summary.leaders, 4);
        assert_eq!(summary.followers, 96);
        assert_eq!(summary.terrain_cells, 100);
        assert_eq!(summary.patches.impassable + summary.patches.soft, 50);
        assert!(summary.impassable_cells <= summary.patches.impassable);
        assert_eq!(sim.summary(), summary);
    }

    #[test]
    fn initialize_rejects_bad_input() {
        assert!(Simulation::initialize(0, 0.1, 10.0, 10.0, 1, 1, 0).is_err());
        assert!(Simulation::initialize(10, 0.1, 0.0, 10.0, 1, 1, 0).is_err());
    }

    #[test]
    fn snapshot_is_stable_between_ticks() {
        let mut sim = small();
        sim.run_tick().unwrap();
        assert_eq!(sim.snapshot_agents(), sim.snapshot_agents());
    }

    #[test]
    fn snapshot_skips_despawned_agents() {
        let mut sim = small();
        sim.despawn(AgentId(20)).unwrap();
        let snap = sim.snapshot_agents();
        assert_eq!(snap.len(), 19);
        assert!(snap.iter().all(|a| a.id != AgentId(20)));
    }

    #[test]
    fn setters_validate_and_record() {
        let mut sim = small();
        assert!(sim.set_tick_interval_hint(0).is_err());
        sim.set_tick_interval_hint(5).unwrap();
        assert_eq!(sim.tick_interval(), Duration::from_millis(5));
        assert!(sim.set_core_utilization_target(101).is_err());
        sim.set_core_utilization_target(90).unwrap();
        assert_eq!(sim.config().core_utilization_pct, 90);
        sim.set_worker_pool_size(3).unwrap();
        assert_eq!(sim.engine().worker_count(), 3);
    }

    #[test]
    fn place_agent_clamps() {
        let mut sim = small();
        sim.place_agent(AgentId(5), Point::new(-10.0, 500.0)).unwrap();
        let a = sim
            .snapshot_agents()
            .into_iter()
            .find(|a| a.id == AgentId(5))
            .unwrap();
        assert_eq!((a.x, a.y), (0.0, 200.0));
        assert_eq!(
            sim.place_agent(AgentId(99), Point::new(0.0, 0.0)),
            Err(StoreError::UnknownAgent(AgentId(99)))
        );
    }
}
