//! Planar points and agent roles.

/// A position in world coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Construct a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Point) -> f64 {
        self.distance_sq(other).sqrt()
    }

    /// Squared Euclidean distance to `other`.
    pub fn distance_sq(self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    /// Both coordinates are finite (neither NaN nor infinite).
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Move at most `step` units toward `target`.
    ///
    /// Returns `(point, arrived)`. When the remaining distance is no
    /// greater than `step` the result snaps exactly onto `target` and
    /// `arrived` is true. The direction is only normalised when the
    /// distance is strictly positive, so a zero-length delta never
    /// divides by zero.
    pub fn step_toward(self, target: Point, step: f64) -> (Point, bool) {
        let dx = target.x - self.x;
        let dy = target.y - self.y;
        let distance = (dx * dx + dy * dy).sqrt();
        if distance > step && distance > 0.0 {
            let moved = Point::new(
                self.x + dx / distance * step,
                self.y + dy / distance * step,
            );
            (moved, false)
        } else {
            (target, true)
        }
    }
}

/// The role an agent is created with. Roles never change during a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// Sets the roaming anchor for a herd. Never follows anyone.
    Leader,
    /// Wanders around its leader's position.
    Follower,
}

impl Role {
    /// Whether this is [`Role::Leader`].
    pub fn is_leader(self) -> bool {
        matches!(self, Role::Leader)
    }
}
