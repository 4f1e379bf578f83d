//! Terrain classes.

use std::fmt;

/// The kind of ground occupying one terrain cell.
///
/// Cells are fixed at world creation. Only [`TerrainType::Impassable`]
/// affects movement: an agent that commits onto it is relocated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TerrainType {
    /// Open ground (foliage). The default for any out-of-grid lookup.
    #[default]
    Open,
    /// Soft ground (sand). Traversable.
    Soft,
    /// Water. Blocks traversal.
    Impassable,
}

impl TerrainType {
    /// Whether agents may rest on this terrain after commit.
    pub fn is_passable(self) -> bool {
        !matches!(self, TerrainType::Impassable)
    }
}

impl fmt::Display for TerrainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Soft => write!(f, "soft"),
            Self::Impassable => write!(f, "impassable"),
        }
    }
}
