//! Test utilities and fixtures for Herd development.
//!
//! Provides a [`RecordingSink`] that keeps every diagnostic line,
//! invariant checkers over an [`AgentStore`], and the behaviour and
//! store fixtures in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::fmt;
use std::sync::{Arc, Mutex};

use herd_arena::AgentStore;
use herd_core::{AgentId, DebugSink};
use herd_world::WorldBounds;

// ── RecordingSink ────────────────────────────────────────────────

/// Debug sink that records every message.
#[derive(Debug, Default)]
pub struct RecordingSink {
    lines: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Copy of every line received so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    /// Lines containing `needle`.
    pub fn count_containing(&self, needle: &str) -> usize {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.contains(needle))
            .count()
    }
}

impl DebugSink for RecordingSink {
    fn emit(&self, message: &str) {
        self.lines.lock().unwrap().push(message.to_owned());
    }
}

// ── Invariant checkers ───────────────────────────────────────────

/// A broken store invariant.
#[derive(Clone, Debug, PartialEq)]
pub enum Violation {
    OutOfBounds { id: AgentId, x: f64, y: f64 },
    NonFinite { id: AgentId },
    LeaderWithLeader { id: AgentId },
    StateRoleMismatch { id: AgentId },
    DanglingLink { id: AgentId, leader: AgentId },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { id, x, y } => write!(f, "agent {id} out of bounds at ({x}, {y})"),
            Self::NonFinite { id } => write!(f, "agent {id} has a non-finite position"),
            Self::LeaderWithLeader { id } => write!(f, "leader {id} has a leader link"),
            Self::StateRoleMismatch { id } => write!(f, "agent {id} is in a state of the other role"),
            Self::DanglingLink { id, leader } => {
                write!(f, "agent {id} linked to {leader}, which is not a live leader")
            }
        }
    }
}

/// Every live agent's committed position is finite and inside `bounds`.
pub fn check_bounds(store: &AgentStore, bounds: &WorldBounds) -> Result<(), Violation> {
    for (a, m) in store.agents().iter().zip(store.motions()) {
        if !a.exists() {
            continue;
        }
        if !m.position.is_finite() {
            return Err(Violation::NonFinite { id: a.id() });
        }
        if !bounds.contains(m.position) {
            return Err(Violation::OutOfBounds {
                id: a.id(),
                x: m.position.x,
                y: m.position.y,
            });
        }
    }
    Ok(())
}

/// No leader has a leader link and every state matches its agent's role.
pub fn check_roles(store: &AgentStore) -> Result<(), Violation> {
    for (a, m) in store.agents().iter().zip(store.motions()) {
        if a.is_leader() && a.leader().is_some() {
            return Err(Violation::LeaderWithLeader { id: a.id() });
        }
        if m.state.role() != a.role() {
            return Err(Violation::StateRoleMismatch { id: a.id() });
        }
    }
    Ok(())
}

/// Every follower link names a live leader.
pub fn check_reachability(store: &AgentStore) -> Result<(), Violation> {
    for a in store.agents().iter().filter(|a| a.exists()) {
        if let Some(leader) = a.leader() {
            if !store.is_live_leader(leader) {
                return Err(Violation::DanglingLink { id: a.id(), leader });
            }
        }
    }
    Ok(())
}

/// All three checks.
pub fn check_all(store: &AgentStore, bounds: &WorldBounds) -> Result<(), Violation> {
    check_bounds(store, bounds)?;
    check_roles(store)?;
    check_reachability(store)
}

/// Live followers without a valid leader.
pub fn orphan_count(store: &AgentStore) -> usize {
    store
        .agents()
        .iter()
        .enumerate()
        .filter(|(i, a)| a.exists() && !a.is_leader() && store.leader_of(*i).is_none())
        .count()
}
