//! Per-tick performance and repair counters.
//!
//! [`TickMetrics`] captures timing and bookkeeping data for a single
//! tick. All durations are in microseconds.

/// Timing and repair metrics collected during a single tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickMetrics {
    /// Wall-clock time for the entire tick.
    pub total_us: u64,
    /// Time spent in the housekeeping pass (zero on ticks without one).
    pub housekeeping_us: u64,
    /// Time spent in the nearest-leader orphan sweep.
    pub sweep_us: u64,
    /// Time from first task submission until the barrier released.
    pub parallel_us: u64,
    /// Time spent in the serial commit phase.
    pub commit_us: u64,
    /// Busy time of the slowest worker task, artificial delay included.
    pub slowest_task_us: u64,
    /// Worker tasks dispatched.
    pub tasks: usize,
    /// Orphans attached by the per-tick sweep.
    pub orphans_swept: usize,
    /// Orphans rehomed by housekeeping.
    pub orphans_rehomed: usize,
    /// Agents moved off impassable terrain at commit.
    pub relocations: usize,
    /// Barrier polls that timed out before every task had replied.
    pub barrier_polls: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = TickMetrics::default();
        assert_eq!(m.total_us, 0);
        assert_eq!(m.tasks, 0);
        assert_eq!(m.relocations, 0);
        assert_eq!(m.barrier_polls, 0);
    }
}
