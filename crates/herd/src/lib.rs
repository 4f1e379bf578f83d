//! Herd: a multithreaded leader/follower agent simulation.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Herd sub-crates. For most users, adding `herd` as a single dependency is
//! sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use herd::prelude::*;
//!
//! // 200 agents, 5% leaders, on a 2000x1200 map with a 20x12 terrain grid.
//! let (mut sim, summary) =
//!     Simulation::initialize(200, 0.05, 2000.0, 1200.0, 20, 12, 7).unwrap();
//! assert_eq!(summary.leaders, 10);
//!
//! for _ in 0..50 {
//!     sim.run_tick().unwrap();
//! }
//! assert_eq!(sim.current_tick(), TickId(50));
//!
//! let agents = sim.snapshot_agents();
//! assert_eq!(agents.len(), 200);
//! assert!(agents.iter().all(|a| a.x >= 0.0 && a.x <= 2000.0));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `herd-core` | IDs, points, colours, terrain types, diagnostic sinks |
//! | [`world`] | `herd-world` | World bounds and the terrain grid |
//! | [`behavior`] | `herd-behavior` | State machine, parameters and the `Behavior` trait |
//! | [`arena`] | `herd-arena` | Agent store, herd links and work partitioning |
//! | [`engine`] | `herd-engine` | Tick coordinator, worker pool and realtime driver |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types (`herd-core`).
///
/// Ids, geometry, herd colours, terrain types, configuration errors and
/// the [`types::DebugSink`] diagnostic hook.
pub use herd_core as types;

/// World bounds and terrain (`herd-world`).
pub use herd_world as world;

/// Agent behaviour (`herd-behavior`).
///
/// The [`behavior::Behavior`] trait is the extension point for custom
/// movement rules; [`behavior::HerdBehavior`] is the built-in state machine.
pub use herd_behavior as behavior;

/// Agent storage and herd membership (`herd-arena`).
pub use herd_arena as arena;

/// Simulation engine (`herd-engine`).
///
/// [`engine::Simulation`] for caller-driven ticking,
/// [`engine::RealtimeDriver`] for a background thread at a fixed cadence.
pub use herd_engine as engine;

/// Common imports for typical Herd usage.
///
/// ```rust
/// use herd::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use herd_core::{AgentId, HerdColor, Point, Role, TerrainType, TickId};

    // Errors
    pub use herd_arena::StoreError;
    pub use herd_core::ConfigError;
    pub use herd_engine::TickError;

    // Diagnostics
    pub use herd_core::{null_sink, DebugSink, LogSink, SharedSink};

    // Behaviour
    pub use herd_behavior::{Behavior, BehaviorParams, HerdBehavior, StateLabel};

    // Engine
    pub use herd_engine::{
        AgentSnapshot, Frame, InitSummary, RealtimeDriver, SimConfig, Simulation, TickMetrics,
        TickReport,
    };
}
