//! Per-agent behaviour state machine for the Herd agent simulation.
//!
//! A [`Behavior`] turns one agent's [`Motion`] record plus the
//! [`Guidance`] the coordinator resolved for it into a [`Proposal`]: the
//! staged next position and next state. It sees nothing else. Leader
//! links, herd membership and every other agent stay with the
//! coordinator, which is what lets proposals for disjoint agent ranges
//! run on separate threads without locks.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod behavior;
pub mod params;
pub mod state;

pub use behavior::{Behavior, Guidance, HerdBehavior, Proposal};
pub use params::BehaviorParams;
pub use state::{BehaviorState, FollowerState, LeaderState, Motion, StateLabel};
