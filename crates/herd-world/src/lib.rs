//! World bounds and terrain grid for the Herd agent simulation.
//!
//! The world is a fixed rectangle `[0, width] x [0, height]` overlaid by
//! a grid of terrain cells. Both are built once at initialization and
//! are read-only while the simulation runs.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod bounds;
pub mod terrain;

pub use bounds::WorldBounds;
pub use terrain::{PatchReport, TerrainGrid};
