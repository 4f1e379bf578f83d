//! Simulation configuration and validation.
//!
//! [`SimConfig`] is the single input to [`Simulation::new`](crate::Simulation::new).
//! [`validate()`](SimConfig::validate) checks every field before any
//! thread or agent is created.

use herd_behavior::BehaviorParams;
use herd_core::ConfigError;
use herd_world::{PatchReport, WorldBounds};

// ── SimConfig ──────────────────────────────────────────────────────

/// Everything needed to build and run a simulation.
#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Total number of agents, leaders included.
    pub population: usize,
    /// Fraction of the population created as leaders, in `(0, 1]`.
    /// The leader count is rounded and clamped to `[1, population]`.
    pub leader_ratio: f64,
    /// World width in world units.
    pub world_width: f64,
    /// World height in world units.
    pub world_height: f64,
    /// Terrain grid columns.
    pub terrain_cols: u32,
    /// Terrain grid rows.
    pub terrain_rows: u32,
    /// Number of randomly placed non-open terrain cells. Default: 50.
    pub terrain_patches: usize,
    /// Seed for every random draw in the run.
    pub seed: u64,

    /// Movement and timing parameters.
    pub behavior: BehaviorParams,
    /// Agent radius range `(min, max)`.
    pub radius: (f64, f64),
    /// Upper bound of the follower personal-space factor, drawn from
    /// `[1, personal_space_max]`.
    pub personal_space_max: f64,

    /// Largest herd the housekeeping pass will rehome an orphan into.
    pub herd_max_size: usize,
    /// Ticks between housekeeping passes. Default: 50.
    pub housekeeping_interval: u64,
    /// Agents examined per housekeeping pass. Default: 100.
    pub housekeeping_batch_size: usize,
    /// Run the nearest-leader orphan sweep every tick.
    pub per_tick_sweep: bool,
    /// Run the periodic capacity-aware housekeeping pass.
    pub housekeeping_enabled: bool,

    /// Worker threads. `None` = available cores minus one, at least 1.
    pub worker_count: Option<usize>,
    /// Target core utilisation in percent, `1..=100`. Below 100 every
    /// task sleeps `(100 - pct) * 0.5` ms after its range.
    pub core_utilization_pct: u32,
    /// Cadence of the realtime driver in milliseconds. Default: 20.
    pub tick_interval_ms: u64,
    /// Barrier poll interval in milliseconds. Default: 1.
    pub barrier_poll_ms: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            population: 1000,
            leader_ratio: 0.04,
            world_width: 10_000.0,
            world_height: 5_625.0,
            terrain_cols: 100,
            terrain_rows: 56,
            terrain_patches: 50,
            seed: 0,
            behavior: BehaviorParams::default(),
            radius: (20.0, 25.0),
            personal_space_max: 2.0,
            herd_max_size: 50,
            housekeeping_interval: 50,
            housekeeping_batch_size: 100,
            per_tick_sweep: true,
            housekeeping_enabled: true,
            worker_count: None,
            core_utilization_pct: 100,
            tick_interval_ms: 20,
            barrier_poll_ms: 1,
        }
    }
}

impl SimConfig {
    /// Defaults with the world-shaping fields of `initialize` replaced.
    pub fn with_world(
        population: usize,
        leader_ratio: f64,
        world_width: f64,
        world_height: f64,
        terrain_cols: u32,
        terrain_rows: u32,
        seed: u64,
    ) -> Self {
        Self {
            population,
            leader_ratio,
            world_width,
            world_height,
            terrain_cols,
            terrain_rows,
            seed,
            ..Self::default()
        }
    }

    /// Check every field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if !(self.leader_ratio.is_finite() && self.leader_ratio > 0.0 && self.leader_ratio <= 1.0)
        {
            return Err(ConfigError::InvalidLeaderRatio {
                value: self.leader_ratio,
            });
        }
        WorldBounds::new(self.world_width, self.world_height)?;
        if self.terrain_cols == 0 || self.terrain_rows == 0 {
            return Err(ConfigError::EmptyTerrainGrid {
                cols: self.terrain_cols,
                rows: self.terrain_rows,
            });
        }
        self.behavior.validate()?;
        let (rmin, rmax) = self.radius;
        if !(rmin.is_finite() && rmax.is_finite() && rmin > 0.0 && rmin <= rmax) {
            return Err(ConfigError::InvalidRange {
                name: "radius",
                min: rmin,
                max: rmax,
            });
        }
        if !(self.personal_space_max.is_finite() && self.personal_space_max >= 1.0) {
            return Err(ConfigError::InvalidParameter {
                name: "personal_space_max",
                reason: format!("must be at least 1, got {}", self.personal_space_max),
            });
        }
        if self.herd_max_size == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "herd_max_size",
                reason: "must be at least 1".into(),
            });
        }
        if self.housekeeping_interval == 0 {
            return Err(ConfigError::ZeroHousekeepingInterval);
        }
        if self.housekeeping_batch_size == 0 {
            return Err(ConfigError::ZeroHousekeepingBatch);
        }
        if self.worker_count == Some(0) {
            return Err(ConfigError::ZeroWorkers);
        }
        validate_utilization(self.core_utilization_pct)?;
        validate_tick_interval(self.tick_interval_ms)?;
        if self.barrier_poll_ms == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "barrier_poll_ms",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Number of leaders this config creates.
    pub fn leader_count(&self) -> usize {
        let raw = (self.population as f64 * self.leader_ratio).round() as usize;
        raw.clamp(1, self.population.max(1))
    }

    /// Resolve the worker count, applying auto-detection if `None`.
    pub fn resolved_worker_count(&self) -> usize {
        match self.worker_count {
            Some(n) => n.max(1),
            None => default_worker_count(),
        }
    }
}

/// Available cores minus one, at least 1.
pub fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(2)
        .saturating_sub(1)
        .max(1)
}

pub(crate) fn validate_utilization(pct: u32) -> Result<(), ConfigError> {
    if (1..=100).contains(&pct) {
        Ok(())
    } else {
        Err(ConfigError::InvalidUtilization { value: pct })
    }
}

pub(crate) fn validate_tick_interval(ms: u64) -> Result<(), ConfigError> {
    if ms == 0 {
        Err(ConfigError::InvalidTickInterval { value: ms })
    } else {
        Ok(())
    }
}

/// Artificial per-task delay for a utilisation target.
pub(crate) fn throttle_delay(pct: u32) -> std::time::Duration {
    let idle = 100u32.saturating_sub(pct);
    std::time::Duration::from_micros(u64::from(idle) * 500)
}

// ── InitSummary ────────────────────────────────────────────────────

/// Counts reported once a simulation is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InitSummary {
    /// Agents created.
    pub agents: usize,
    /// Of which leaders.
    pub leaders: usize,
    /// Of which followers.
    pub followers: usize,
    /// Terrain cells in the grid.
    pub terrain_cells: usize,
    /// Impassable terrain cells.
    pub impassable_cells: usize,
    /// Terrain patches placed, by kind. Patches landing on the same
    /// cell are each counted.
    pub patches: PatchReport,
    /// Worker threads in the pool.
    pub workers: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_population_rejected() {
        let c = SimConfig {
            population: 0,
            ..Default::default()
        };
        assert_eq!(c.validate(), Err(ConfigError::EmptyPopulation));
    }

    #[test]
    fn bad_world_rejected() {
        let c = SimConfig::with_world(10, 0.1, -5.0, 100.0, 4, 4, 1);
        assert!(matches!(
            c.validate(),
            Err(ConfigError::InvalidWorldSize { .. })
        ));
    }

    #[test]
    fn zero_workers_rejected() {
        let c = SimConfig {
            worker_count: Some(0),
            ..Default::default()
        };
        assert_eq!(c.validate(), Err(ConfigError::ZeroWorkers));
    }

    #[test]
    fn utilization_out_of_range_rejected() {
        for pct in [0, 101] {
            let c = SimConfig {
                core_utilization_pct: pct,
                ..Default::default()
            };
            assert_eq!(
                c.validate(),
                Err(ConfigError::InvalidUtilization { value: pct })
            );
        }
    }

    #[test]
    fn housekeeping_zeroes_rejected() {
        let c = SimConfig {
            housekeeping_interval: 0,
            ..Default::default()
        };
        assert_eq!(c.validate(), Err(ConfigError::ZeroHousekeepingInterval));
        let c = SimConfig {
            housekeeping_batch_size: 0,
            ..Default::default()
        };
        assert_eq!(c.validate(), Err(ConfigError::ZeroHousekeepingBatch));
    }

    #[test]
    fn leader_count_rounds_and_clamps() {
        let c = SimConfig::with_world(100, 0.04, 1000.0, 1000.0, 10, 10, 0);
        assert_eq!(c.leader_count(), 4);
        let c = SimConfig::with_world(10, 0.01, 1000.0, 1000.0, 10, 10, 0);
        assert_eq!(c.leader_count(), 1);
        let c = SimConfig::with_world(3, 1.0, 1000.0, 1000.0, 10, 10, 0);
        assert_eq!(c.leader_count(), 3);
    }

    #[test]
    fn throttle_scales_with_idle_share() {
        assert_eq!(throttle_delay(100).as_micros(), 0);
        assert_eq!(throttle_delay(50).as_micros(), 25_000);
        assert_eq!(throttle_delay(1).as_micros(), 49_500);
    }

    #[test]
    fn explicit_worker_count_is_used() {
        let c = SimConfig {
            worker_count: Some(3),
            ..Default::default()
        };
        assert_eq!(c.resolved_worker_count(), 3);
        assert!(default_worker_count() >= 1);
    }
}
