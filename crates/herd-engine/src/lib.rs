//! Tick coordinator for the Herd agent simulation.
//!
//! Provides [`Simulation`], which owns the world, the agent store and a
//! worker pool, and advances them one tick at a time: membership repair
//! on the calling thread, behaviour proposals on the pool, then a serial
//! commit. [`RealtimeDriver`] runs the same loop at a fixed cadence on
//! a background thread.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod commit;
pub mod config;
pub mod membership;
pub mod metrics;
pub mod pool;
mod populate;
pub mod realtime;
pub mod simulation;
pub mod tick;

pub use config::{default_worker_count, InitSummary, SimConfig};
pub use membership::{Housekeeping, HousekeepingReport};
pub use metrics::TickMetrics;
pub use pool::WorkerPool;
pub use realtime::{Frame, RealtimeDriver};
pub use simulation::{AgentSnapshot, Simulation};
pub use tick::{TickEngine, TickError, TickReport};
