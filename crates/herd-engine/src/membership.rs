//! Leader assignment and herd membership repair.
//!
//! Two repair paths run in the exclusive phase of a tick:
//!
//! - the **sweep** attaches every orphan to its nearest live leader,
//!   ignoring herd size, every tick;
//! - **housekeeping** walks a resumable window of the store every
//!   `interval` ticks and rehomes orphans to a random leader whose herd
//!   is below `herd_max_size`.
//!
//! A link to a dead or non-leader agent counts as no link: both paths
//! clear it and re-link instead of failing.

use indexmap::IndexMap;
use rand::seq::SliceRandom;
use rand::Rng;

use herd_arena::AgentStore;
use herd_behavior::{BehaviorState, FollowerState};
use herd_core::{AgentId, DebugSink, Point};

/// Nearest leader to `p`. Ties go to the earliest entry, which for
/// [`AgentStore::live_leaders`] is the lowest id.
pub fn nearest_leader(leaders: &[(AgentId, Point)], p: Point) -> Option<AgentId> {
    let mut best: Option<(AgentId, f64)> = None;
    for &(id, pos) in leaders {
        let d = pos.distance_sq(p);
        match best {
            Some((_, bd)) if d >= bd => {}
            _ => best = Some((id, d)),
        }
    }
    best.map(|(id, _)| id)
}

/// Clear a follower's link if it points at something other than a live
/// leader. Returns true when the follower is (now) an orphan.
fn clear_invalid_link(store: &mut AgentStore, index: usize) -> bool {
    if store.leader_of(index).is_some() {
        return false;
    }
    let Some(agent) = store.agent(index) else {
        return false;
    };
    let id = agent.id();
    if let Some(stale) = agent.leader() {
        log::warn!("agent {id} linked to {stale}, which is not a live leader; unlinking");
        let _ = store.unlink(id);
    }
    true
}

/// Live followers without a valid leader, in index order.
fn orphan_indices(store: &AgentStore, range: std::ops::Range<usize>) -> Vec<usize> {
    store.agents()[range.clone()]
        .iter()
        .zip(range)
        .filter(|(a, i)| a.exists() && !a.is_leader() && store.leader_of(*i).is_none())
        .map(|(_, i)| i)
        .collect()
}

/// Link every follower to its nearest leader. Used at creation.
/// Returns how many followers were linked.
pub fn assign_nearest(store: &mut AgentStore) -> usize {
    sweep_orphans(store)
}

/// Attach every orphan to its nearest live leader.
/// Returns how many orphans were attached.
pub fn sweep_orphans(store: &mut AgentStore) -> usize {
    let orphans = orphan_indices(store, 0..store.len());
    if orphans.is_empty() {
        return 0;
    }
    let leaders = store.live_leaders();
    let mut attached = 0;
    for i in orphans {
        clear_invalid_link(store, i);
        let (Some(agent), Some(motion)) = (store.agent(i), store.motion(i)) else {
            continue;
        };
        let id = agent.id();
        let Some(leader) = nearest_leader(&leaders, motion.position) else {
            break;
        };
        if store.link(id, leader).is_ok() {
            attached += 1;
        }
    }
    attached
}

// ── Housekeeping ───────────────────────────────────────────────────

/// Outcome of one housekeeping pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HousekeepingReport {
    /// Store indices examined.
    pub scanned: usize,
    /// Orphans found in the window.
    pub orphans: usize,
    /// Orphans rehomed.
    pub rehomed: usize,
}

/// Periodic, resumable, capacity-aware orphan repair.
#[derive(Clone, Debug)]
pub struct Housekeeping {
    interval: u64,
    batch_size: usize,
    herd_max_size: usize,
    counter: u64,
    cursor: usize,
}

impl Housekeeping {
    /// A pass every `interval` ticks over `batch_size` agents.
    pub fn new(interval: u64, batch_size: usize, herd_max_size: usize) -> Self {
        Self {
            interval: interval.max(1),
            batch_size: batch_size.max(1),
            herd_max_size,
            counter: 0,
            cursor: 0,
        }
    }

    /// Store index the next pass starts at.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Advance the tick counter and run a pass when it reaches the interval.
    pub fn on_tick<R: Rng + ?Sized>(
        &mut self,
        store: &mut AgentStore,
        rng: &mut R,
        sink: &dyn DebugSink,
    ) -> Option<HousekeepingReport> {
        self.counter += 1;
        if self.counter < self.interval {
            return None;
        }
        self.counter = 0;
        Some(self.run_pass(store, rng, sink))
    }

    /// Examine the next window of agents and rehome its orphans.
    ///
    /// The window is `batch_size` indices from the cursor, cut short at
    /// the end of the store; the cursor then wraps to 0.
    pub fn run_pass<R: Rng + ?Sized>(
        &mut self,
        store: &mut AgentStore,
        rng: &mut R,
        sink: &dyn DebugSink,
    ) -> HousekeepingReport {
        let len = store.len();
        if self.cursor >= len {
            self.cursor = 0;
        }
        let end = (self.cursor + self.batch_size).min(len);
        let window = self.cursor..end;
        self.cursor = if end >= len { 0 } else { end };

        let orphans = orphan_indices(store, window.clone());
        let mut report = HousekeepingReport {
            scanned: window.len(),
            orphans: orphans.len(),
            rehomed: 0,
        };
        if !orphans.is_empty() {
            let mut sizes: IndexMap<AgentId, usize> = store.herd_sizes();
            for i in orphans {
                clear_invalid_link(store, i);
                let open: Vec<AgentId> = sizes
                    .iter()
                    .filter(|(_, n)| **n < self.herd_max_size)
                    .map(|(id, _)| *id)
                    .collect();
                let Some(&leader) = open.choose(rng) else {
                    break;
                };
                let Some(id) = store.agent(i).map(|a| a.id()) else {
                    continue;
                };
                if store.link(id, leader).is_err() {
                    continue;
                }
                if let Some(n) = sizes.get_mut(&leader) {
                    *n += 1;
                }
                if let Some(m) = store.motion_mut(i) {
                    m.state = BehaviorState::Follower(FollowerState::Unsettled);
                }
                report.rehomed += 1;
            }
        }

        sink.emit(&format!(
            "housekeeping: scanned {}, orphans {}, rehomed {}",
            report.scanned, report.orphans, report.rehomed
        ));
        log::debug!(
            "housekeeping pass: scanned {} orphans {} rehomed {} next cursor {}",
            report.scanned,
            report.orphans,
            report.rehomed,
            self.cursor
        );
        report
    }
}
