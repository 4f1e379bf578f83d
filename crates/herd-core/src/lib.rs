//! Core types and traits for the Herd agent simulation.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by every other crate in the workspace: agent
//! and tick identifiers, planar points, terrain classes, herd colours,
//! the diagnostic sink, and configuration errors.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod color;
pub mod error;
pub mod geom;
pub mod id;
pub mod sink;
pub mod terrain;

pub use color::HerdColor;
pub use error::ConfigError;
pub use geom::{Point, Role};
pub use id::{AgentId, TickId};
pub use sink::{null_sink, DebugSink, FnSink, LogSink, NullSink, SharedSink};
pub use terrain::TerrainType;
