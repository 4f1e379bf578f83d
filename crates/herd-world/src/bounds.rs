//! The rectangular extent of the world.

use herd_core::{ConfigError, Point};
use rand::Rng;

/// Fixed world rectangle `[0, width] x [0, height]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldBounds {
    width: f64,
    height: f64,
}

impl WorldBounds {
    /// Create bounds, rejecting non-finite or non-positive dimensions.
    pub fn new(width: f64, height: f64) -> Result<Self, ConfigError> {
        if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
            return Err(ConfigError::InvalidWorldSize { width, height });
        }
        Ok(Self { width, height })
    }

    /// World width.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// World height.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Clamp `p` into the world rectangle.
    ///
    /// A NaN coordinate maps to 0 so that a numerical accident can never
    /// leak out of a tick as a non-finite position.
    pub fn clamp(&self, p: Point) -> Point {
        Point::new(clamp_axis(p.x, self.width), clamp_axis(p.y, self.height))
    }

    /// Whether `p` lies inside the rectangle, edges included.
    pub fn contains(&self, p: Point) -> bool {
        (0.0..=self.width).contains(&p.x) && (0.0..=self.height).contains(&p.y)
    }

    /// Uniformly random point in `[0, width) x [0, height)`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Point {
        Point::new(rng.gen_range(0.0..self.width), rng.gen_range(0.0..self.height))
    }

    /// `center` displaced by an independent uniform offset in
    /// `[-half_extent, +half_extent]` on each axis, clamped into bounds.
    pub fn sample_box<R: Rng + ?Sized>(&self, center: Point, half_extent: f64, rng: &mut R) -> Point {
        let half = half_extent.abs();
        let offset_x = rng.gen_range(-half..=half);
        let offset_y = rng.gen_range(-half..=half);
        self.clamp(Point::new(center.x + offset_x, center.y + offset_y))
    }
}

fn clamp_axis(v: f64, max: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, max)
    }
}
