//! Tick engine: the parallel-propose, serial-commit simulation loop.
//!
//! [`TickEngine`] owns the agent store, terrain and worker pool. Each
//! [`execute_tick()`](TickEngine::execute_tick) runs:
//!
//! 1. housekeeping (every `housekeeping_interval` ticks);
//! 2. the nearest-leader orphan sweep;
//! 3. guidance resolution (who follows whom, where the leader stands);
//! 4. the parallel phase: motion chunks out to workers;
//! 5. the barrier: every chunk back;
//! 6. commit: staged positions become committed, terrain enforced.
//!
//! Steps 1-3 and 6 run on the calling thread with exclusive access to
//! the store. Leader links are only ever read or written there.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::RecvTimeoutError;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use herd_arena::{AgentStore, MotionChunk, StoreError};
use herd_behavior::{Behavior, Guidance};
use herd_core::{ConfigError, SharedSink, TickId};
use herd_world::{PatchReport, TerrainGrid};

use crate::commit::commit;
use crate::config::{throttle_delay, validate_utilization, SimConfig};
use crate::membership::{sweep_orphans, Housekeeping};
use crate::metrics::TickMetrics;
use crate::pool::{RangeTask, WorkerPool};
use crate::populate::populate;

/// Barrier polls in one tick before a slow-tick warning is logged.
const SLOW_BARRIER_POLLS: u64 = 1000;

// ── TickReport ───────────────────────────────────────────────────

/// Result of a successful tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickReport {
    /// The tick just committed.
    pub tick: TickId,
    /// Performance and repair counters for this tick.
    pub metrics: TickMetrics,
}

// ── TickError ───────────────────────────────────────────────────

/// Error returned from [`TickEngine::execute_tick()`].
///
/// Neither variant occurs under normal operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickError {
    /// A worker thread died or dropped its task, taking that task's
    /// chunk of agents with it. Ticking is disabled from here on.
    WorkerLost {
        /// Index of the lost task.
        task: usize,
    },
    /// Returned chunks did not reassemble into the store.
    Store(StoreError),
    /// A previous tick failed; the engine no longer ticks.
    TickDisabled,
}

impl fmt::Display for TickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WorkerLost { task } => write!(f, "worker lost while running task {task}"),
            Self::Store(e) => write!(f, "agent store: {e}"),
            Self::TickDisabled => write!(f, "ticking is disabled after an earlier failure"),
        }
    }
}

impl std::error::Error for TickError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(e) => Some(e),
            _ => None,
        }
    }
}

// ── TickEngine ───────────────────────────────────────────────────

/// Owns all simulation state and executes ticks.
pub struct TickEngine {
    store: AgentStore,
    terrain: TerrainGrid,
    patches: PatchReport,
    leaders: usize,
    behavior: Arc<dyn Behavior>,
    pool: WorkerPool,
    housekeeping: Housekeeping,
    rng: ChaCha8Rng,
    seed: u64,
    current_tick: TickId,
    per_tick_sweep: bool,
    housekeeping_enabled: bool,
    task_delay: Duration,
    barrier_poll: Duration,
    sink: SharedSink,
    tick_disabled: bool,
    last_metrics: TickMetrics,
}

impl TickEngine {
    /// Validate `config`, build the world and population, and start the
    /// worker pool.
    pub fn new(
        config: &SimConfig,
        behavior: Arc<dyn Behavior>,
        sink: SharedSink,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let world = populate(config, &mut rng)?;
        let pool = WorkerPool::spawn(
            config.resolved_worker_count(),
            Arc::clone(&behavior),
            *world.terrain.bounds(),
            Arc::clone(&sink),
        )?;
        Ok(Self {
            store: world.store,
            terrain: world.terrain,
            patches: world.patches,
            leaders: world.leaders,
            behavior,
            pool,
            housekeeping: Housekeeping::new(
                config.housekeeping_interval,
                config.housekeeping_batch_size,
                config.herd_max_size,
            ),
            rng,
            seed: config.seed,
            current_tick: TickId(0),
            per_tick_sweep: config.per_tick_sweep,
            housekeeping_enabled: config.housekeeping_enabled,
            task_delay: throttle_delay(config.core_utilization_pct),
            barrier_poll: Duration::from_millis(config.barrier_poll_ms),
            sink,
            tick_disabled: false,
            last_metrics: TickMetrics::default(),
        })
    }

    /// Advance the simulation by one tick.
    pub fn execute_tick(&mut self) -> Result<TickReport, TickError> {
        if self.tick_disabled {
            return Err(TickError::TickDisabled);
        }
        let tick_start = Instant::now();
        let next_tick = TickId(self.current_tick.0 + 1);
        let mut metrics = TickMetrics::default();

        // 1. Housekeeping.
        if self.housekeeping_enabled {
            let t = Instant::now();
            if let Some(report) =
                self.housekeeping
                    .on_tick(&mut self.store, &mut self.rng, &*self.sink)
            {
                metrics.orphans_rehomed = report.rehomed;
            }
            metrics.housekeeping_us = t.elapsed().as_micros() as u64;
        }

        // 2. Nearest-leader sweep.
        if self.per_tick_sweep {
            let t = Instant::now();
            metrics.orphans_swept = sweep_orphans(&mut self.store);
            metrics.sweep_us = t.elapsed().as_micros() as u64;
        }

        // 3. Guidance, resolved while we still have exclusive access.
        let guidance: Arc<[Guidance]> = self.resolve_guidance().into();

        // 4. Parallel phase.
        let par_start = Instant::now();
        let chunks = self.store.take_chunks(self.pool.size());
        let task_count = chunks.len();
        metrics.tasks = task_count;
        let (reply_tx, reply_rx) = crossbeam_channel::bounded(task_count.max(1));
        for (task, chunk) in chunks.into_iter().enumerate() {
            let submitted = self.pool.submit(RangeTask {
                task,
                tick: next_tick,
                seed: self.seed,
                chunk,
                guidance: Arc::clone(&guidance),
                delay: self.task_delay,
                reply: reply_tx.clone(),
            });
            if submitted.is_err() {
                return Err(self.disable(TickError::WorkerLost { task }));
            }
        }
        drop(reply_tx);

        // 5. Barrier.
        let mut slots: Vec<Option<MotionChunk>> = (0..task_count).map(|_| None).collect();
        let mut received = 0;
        while received < task_count {
            match reply_rx.recv_timeout(self.barrier_poll) {
                Ok(result) => {
                    metrics.slowest_task_us = metrics.slowest_task_us.max(result.busy_us);
                    if let Some(slot) = slots.get_mut(result.task) {
                        if slot.replace(result.chunk).is_none() {
                            received += 1;
                        }
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    metrics.barrier_polls += 1;
                    if metrics.barrier_polls == SLOW_BARRIER_POLLS {
                        log::warn!(
                            "tick {next_tick}: barrier still waiting on {} of {task_count} tasks",
                            task_count - received
                        );
                    }
                    std::thread::yield_now();
                }
                Err(RecvTimeoutError::Disconnected) => {
                    let task = slots.iter().position(Option::is_none).unwrap_or(0);
                    return Err(self.disable(TickError::WorkerLost { task }));
                }
            }
        }
        metrics.parallel_us = par_start.elapsed().as_micros() as u64;

        // 6. Commit.
        let commit_start = Instant::now();
        let chunks: Vec<MotionChunk> = slots.into_iter().flatten().collect();
        if let Err(e) = self.store.restore_chunks(chunks) {
            return Err(self.disable(TickError::Store(e)));
        }
        metrics.relocations = commit(&mut self.store, &self.terrain, &mut self.rng);
        metrics.commit_us = commit_start.elapsed().as_micros() as u64;

        self.current_tick = next_tick;
        metrics.total_us = tick_start.elapsed().as_micros() as u64;
        self.last_metrics = metrics.clone();
        Ok(TickReport {
            tick: next_tick,
            metrics,
        })
    }

    fn disable(&mut self, err: TickError) -> TickError {
        self.tick_disabled = true;
        log::error!("tick {} failed, disabling: {err}", self.current_tick.0 + 1);
        self.sink.emit(&format!("tick failed: {err}"));
        err
    }

    fn resolve_guidance(&self) -> Vec<Guidance> {
        let store = &self.store;
        store
            .agents()
            .iter()
            .enumerate()
            .map(|(i, a)| {
                if !a.exists() {
                    Guidance::Dormant
                } else if a.is_leader() {
                    Guidance::Leader
                } else {
                    match store.leader_of(i).and_then(|l| store.leader_position(l)) {
                        Some(anchor) => Guidance::Herd { anchor },
                        None => Guidance::Orphan,
                    }
                }
            })
            .collect()
    }

    /// Replace the worker pool with one of `size` threads.
    pub fn set_worker_count(&mut self, size: usize) -> Result<(), ConfigError> {
        if size == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        if size == self.pool.size() {
            return Ok(());
        }
        let pool = WorkerPool::spawn(
            size,
            Arc::clone(&self.behavior),
            *self.terrain.bounds(),
            Arc::clone(&self.sink),
        )?;
        let mut old = std::mem::replace(&mut self.pool, pool);
        old.shutdown();
        log::info!("worker pool resized to {size}");
        Ok(())
    }

    /// Change the per-task artificial delay via a utilisation target.
    pub fn set_core_utilization(&mut self, pct: u32) -> Result<(), ConfigError> {
        validate_utilization(pct)?;
        self.task_delay = throttle_delay(pct);
        Ok(())
    }

    /// Enable or disable the per-tick nearest-leader sweep.
    pub fn set_per_tick_sweep(&mut self, enabled: bool) {
        self.per_tick_sweep = enabled;
    }

    /// Enable or disable periodic housekeeping.
    pub fn set_housekeeping_enabled(&mut self, enabled: bool) {
        self.housekeeping_enabled = enabled;
    }

    /// The agent store.
    pub fn store(&self) -> &AgentStore {
        &self.store
    }

    /// Mutable store access between ticks, for setup and fault injection.
    pub fn store_mut(&mut self) -> &mut AgentStore {
        &mut self.store
    }

    /// The terrain grid.
    pub fn terrain(&self) -> &TerrainGrid {
        &self.terrain
    }

    /// Mutable terrain access between ticks.
    pub fn terrain_mut(&mut self) -> &mut TerrainGrid {
        &mut self.terrain
    }

    /// Terrain patches placed at creation.
    pub fn patches(&self) -> PatchReport {
        self.patches
    }

    /// Leaders created at startup.
    pub fn leader_count(&self) -> usize {
        self.leaders
    }

    /// Worker threads in the pool.
    pub fn worker_count(&self) -> usize {
        self.pool.size()
    }

    /// Last committed tick.
    pub fn current_tick(&self) -> TickId {
        self.current_tick
    }

    /// Whether an earlier failure stopped ticking.
    pub fn is_tick_disabled(&self) -> bool {
        self.tick_disabled
    }

    /// Metrics from the most recent successful tick.
    pub fn last_metrics(&self) -> &TickMetrics {
        &self.last_metrics
    }

    /// Name of the installed behaviour.
    pub fn behavior_name(&self) -> &str {
        self.behavior.name()
    }
}

impl fmt::Debug for TickEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickEngine")
            .field("agents", &self.store.len())
            .field("workers", &self.pool.size())
            .field("current_tick", &self.current_tick)
            .field("tick_disabled", &self.tick_disabled)
            .finish()
    }
}
