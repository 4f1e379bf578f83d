//! Strongly-typed identifiers.

use std::fmt;

/// Identifies an agent for the lifetime of a run.
///
/// Assigned sequentially from 1 in creation order and never reused,
/// including after an agent is soft-deleted. Lower ids were created
/// earlier, which makes them a stable tie-breaker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(pub u32);

impl AgentId {
    /// The first id handed out by a fresh store.
    pub const FIRST: AgentId = AgentId(1);

    /// The id following this one.
    pub fn next(self) -> AgentId {
        AgentId(self.0 + 1)
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for AgentId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Monotonically increasing tick counter.
///
/// Incremented once per committed tick. `TickId(0)` is the state
/// produced by initialization, before any tick has run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickId(pub u64);

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TickId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_ids_order_by_creation() {
        let a = AgentId::FIRST;
        let b = a.next();
        assert!(a < b);
        assert_eq!(b, AgentId(2));
    }

    #[test]
    fn display_is_bare_number() {
        assert_eq!(AgentId(17).to_string(), "17");
        assert_eq!(TickId(3).to_string(), "3");
    }
}
