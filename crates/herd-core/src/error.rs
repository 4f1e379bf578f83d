//! Configuration errors surfaced at setup time.

use std::error::Error;
use std::fmt;

/// A simulation was configured with values it cannot run with.
///
/// Raised synchronously by validation before any agent exists, or by a
/// runtime setter before its value is applied. The simulation refuses
/// to start (or keeps its previous setting) when one is returned.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Population size is zero.
    EmptyPopulation,
    /// Leader ratio is not finite or outside `(0, 1]`.
    InvalidLeaderRatio {
        /// The rejected ratio.
        value: f64,
    },
    /// World width or height is not finite and positive.
    InvalidWorldSize {
        /// Configured width.
        width: f64,
        /// Configured height.
        height: f64,
    },
    /// Terrain grid has zero columns or rows.
    EmptyTerrainGrid {
        /// Configured columns.
        cols: u32,
        /// Configured rows.
        rows: u32,
    },
    /// Worker pool size is zero.
    ZeroWorkers,
    /// Core utilisation target outside `1..=100`.
    InvalidUtilization {
        /// The rejected percentage.
        value: u32,
    },
    /// Tick interval hint is zero.
    InvalidTickInterval {
        /// The rejected interval in milliseconds.
        value: u64,
    },
    /// A `(min, max)` pair has `min > max` or a bad endpoint.
    InvalidRange {
        /// Which range.
        name: &'static str,
        /// Configured lower bound.
        min: f64,
        /// Configured upper bound.
        max: f64,
    },
    /// A scalar parameter is out of its domain.
    InvalidParameter {
        /// Which parameter.
        name: &'static str,
        /// What is wrong with it.
        reason: String,
    },
    /// Housekeeping interval is zero.
    ZeroHousekeepingInterval,
    /// Housekeeping batch size is zero.
    ZeroHousekeepingBatch,
    /// A background thread could not be spawned.
    ThreadSpawnFailed {
        /// Description of which thread failed.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPopulation => write!(f, "population must be at least 1"),
            Self::InvalidLeaderRatio { value } => {
                write!(f, "leader_ratio must be in (0, 1], got {value}")
            }
            Self::InvalidWorldSize { width, height } => {
                write!(f, "world size must be finite and positive, got {width}x{height}")
            }
            Self::EmptyTerrainGrid { cols, rows } => {
                write!(f, "terrain grid must have cells, got {cols}x{rows}")
            }
            Self::ZeroWorkers => write!(f, "worker pool size must be at least 1"),
            Self::InvalidUtilization { value } => {
                write!(f, "core utilization must be in 1..=100, got {value}")
            }
            Self::InvalidTickInterval { value } => {
                write!(f, "tick interval must be at least 1 ms, got {value}")
            }
            Self::InvalidRange { name, min, max } => {
                write!(f, "invalid {name} range: min {min}, max {max}")
            }
            Self::InvalidParameter { name, reason } => {
                write!(f, "invalid {name}: {reason}")
            }
            Self::ZeroHousekeepingInterval => {
                write!(f, "housekeeping_interval must be at least 1")
            }
            Self::ZeroHousekeepingBatch => {
                write!(f, "housekeeping_batch_size must be at least 1")
            }
            Self::ThreadSpawnFailed { reason } => {
                write!(f, "thread spawn failed: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}
