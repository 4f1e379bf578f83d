//! Agent store error types.

use std::error::Error;
use std::fmt;

use herd_core::AgentId;

/// Errors from the exclusive-phase store API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreError {
    /// No agent with this id was ever created.
    UnknownAgent(AgentId),
    /// The operation needs a follower.
    NotAFollower(AgentId),
    /// The operation needs a live leader.
    NotALeader(AgentId),
    /// Returned motion chunks do not cover the store exactly once, in order.
    ChunkMismatch {
        /// Index the next chunk should have started at.
        expected: usize,
        /// Index it actually started at.
        found: usize,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownAgent(id) => write!(f, "unknown agent: {id}"),
            Self::NotAFollower(id) => write!(f, "agent {id} is not a follower"),
            Self::NotALeader(id) => write!(f, "agent {id} is not a live leader"),
            Self::ChunkMismatch { expected, found } => write!(
                f,
                "motion chunk out of place: expected start {expected}, found {found}"
            ),
        }
    }
}

impl Error for StoreError {}
