//! Terrain grid laid over the world rectangle.
//!
//! The grid divides the world into `cols x rows` equal cells. Column
//! width is `width / cols` and row height is `height / rows`, so the
//! grid covers the whole world exactly. Lookups outside the grid (which
//! includes the far edges `x == width` and `y == height`) answer
//! [`TerrainType::Open`] rather than failing.

use herd_core::{ConfigError, Point, TerrainType};
use rand::Rng;

use crate::bounds::WorldBounds;

/// Rejection-sampling attempts before [`TerrainGrid::passable_point`]
/// falls back to enumerating passable cells.
const SAMPLE_ATTEMPTS: usize = 32;

/// Result of scattering terrain patches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PatchReport {
    /// Patches that turned a cell impassable.
    pub impassable: usize,
    /// Patches that turned a cell soft.
    pub soft: usize,
}

/// Immutable-after-setup terrain lookup table.
#[derive(Clone, Debug)]
pub struct TerrainGrid {
    bounds: WorldBounds,
    cols: u32,
    rows: u32,
    cell_width: f64,
    cell_height: f64,
    /// Row-major: `cells[row * cols + col]`.
    cells: Vec<TerrainType>,
}

impl TerrainGrid {
    /// Create a grid of open cells.
    pub fn new(bounds: WorldBounds, cols: u32, rows: u32) -> Result<Self, ConfigError> {
        if cols == 0 || rows == 0 {
            return Err(ConfigError::EmptyTerrainGrid { cols, rows });
        }
        let len = (cols as usize)
            .checked_mul(rows as usize)
            .ok_or_else(|| ConfigError::InvalidParameter {
                name: "terrain grid",
                reason: format!("{cols}x{rows} cells overflow usize"),
            })?;
        Ok(Self {
            bounds,
            cols,
            rows,
            cell_width: bounds.width() / f64::from(cols),
            cell_height: bounds.height() / f64::from(rows),
            cells: vec![TerrainType::Open; len],
        })
    }

    /// Number of columns.
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Number of rows.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// The world rectangle this grid covers.
    pub fn bounds(&self) -> &WorldBounds {
        &self.bounds
    }

    /// Number of impassable cells.
    pub fn impassable_count(&self) -> usize {
        self.cells.iter().filter(|t| !t.is_passable()).count()
    }

    /// Terrain of cell `(col, row)`, or `None` outside the grid.
    pub fn cell(&self, col: u32, row: u32) -> Option<TerrainType> {
        self.flat_index(col, row).map(|i| self.cells[i])
    }

    /// Overwrite one cell. Returns `false` outside the grid.
    ///
    /// Intended for world construction and test setup only.
    pub fn set_cell(&mut self, col: u32, row: u32, terrain: TerrainType) -> bool {
        match self.flat_index(col, row) {
            Some(i) => {
                self.cells[i] = terrain;
                true
            }
            None => false,
        }
    }

    /// The `(col, row)` cell containing `p`, or `None` outside the grid.
    pub fn cell_of(&self, p: Point) -> Option<(u32, u32)> {
        if !p.is_finite() || p.x < 0.0 || p.y < 0.0 {
            return None;
        }
        let col = (p.x / self.cell_width).floor();
        let row = (p.y / self.cell_height).floor();
        if col >= f64::from(self.cols) || row >= f64::from(self.rows) {
            return None;
        }
        Some((col as u32, row as u32))
    }

    /// Terrain at world point `p`. Out-of-grid points are open ground.
    pub fn terrain_at(&self, p: Point) -> TerrainType {
        self.cell_of(p)
            .and_then(|(col, row)| self.cell(col, row))
            .unwrap_or_default()
    }

    /// Scatter `count` single-cell patches at uniformly random cells.
    ///
    /// Each patch is impassable or soft with equal probability. Patches
    /// may land on the same cell; the later one wins.
    pub fn scatter_patches<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) -> PatchReport {
        let mut report = PatchReport::default();
        for _ in 0..count {
            let col = rng.gen_range(0..self.cols);
            let row = rng.gen_range(0..self.rows);
            let terrain = if rng.gen_bool(0.5) {
                report.impassable += 1;
                TerrainType::Impassable
            } else {
                report.soft += 1;
                TerrainType::Soft
            };
            self.set_cell(col, row, terrain);
        }
        report
    }

    /// A uniformly random in-bounds point whose terrain is passable.
    ///
    /// Tries rejection sampling first. If every attempt lands on
    /// impassable ground, picks a random passable cell and returns its
    /// centre. Returns `None` only when no cell is passable.
    pub fn passable_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Point> {
        for _ in 0..SAMPLE_ATTEMPTS {
            let candidate = self.bounds.sample(rng);
            if self.terrain_at(candidate).is_passable() {
                return Some(candidate);
            }
        }
        let passable: Vec<usize> = self
            .cells
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_passable())
            .map(|(i, _)| i)
            .collect();
        if passable.is_empty() {
            return None;
        }
        let flat = passable[rng.gen_range(0..passable.len())];
        let col = (flat % self.cols as usize) as f64;
        let row = (flat / self.cols as usize) as f64;
        Some(Point::new(
            (col + 0.5) * self.cell_width,
            (row + 0.5) * self.cell_height,
        ))
    }

    fn flat_index(&self, col: u32, row: u32) -> Option<usize> {
        if col < self.cols && row < self.rows {
            Some(row as usize * self.cols as usize + col as usize)
        } else {
            None
        }
    }
}
