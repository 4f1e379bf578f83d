//! Stable-index agent store for the Herd agent simulation.
//!
//! Agents live in two parallel columns:
//!
//! ```text
//! AgentStore
//! ├── agents:  Vec<Agent>   identity + topology (leader link, colour)
//! ├── motion:  Vec<Motion>  per-tick kinematics + behaviour state
//! └── index:   IndexMap<AgentId, usize>
//! ```
//!
//! Indices never move: agents are soft-deleted, never removed. During
//! the parallel phase the `motion` column is cut into owned
//! [`MotionChunk`]s, one per worker range, and stitched back together
//! before commit. The `agents` column never leaves the coordinating
//! thread, so leader links can only change in the exclusive phase.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod partition;
pub mod store;

pub use error::StoreError;
pub use partition::{partition_ranges, MotionChunk, Ranges};
pub use store::{Agent, AgentSpec, AgentStore};
