//! Tunable behaviour parameters.

use herd_core::ConfigError;
use rand::Rng;

/// Movement and timing parameters for [`HerdBehavior`](crate::HerdBehavior).
///
/// Speeds and extents are in world units per tick; rest ranges are
/// inclusive tick counts.
#[derive(Clone, Debug, PartialEq)]
pub struct BehaviorParams {
    /// Leader movement per tick.
    pub leader_speed: f64,
    /// Follower movement per tick.
    pub follower_speed: f64,
    /// Leader rest countdown range `(min, max)`.
    pub leader_rest_ticks: (u32, u32),
    /// Follower rest countdown range `(min, max)`.
    pub follower_rest_ticks: (u32, u32),
    /// Half-extent of the box a resting leader picks its next target in.
    pub leader_wander_box: f64,
    /// Half-extent of the box around its leader a follower wanders to.
    pub herd_footprint: f64,
    /// Half-extent of the box around itself an orphan wanders to.
    pub orphan_wander: f64,
}

impl Default for BehaviorParams {
    fn default() -> Self {
        Self {
            leader_speed: 5.0,
            follower_speed: 10.0,
            leader_rest_ticks: (50, 200),
            follower_rest_ticks: (20, 80),
            leader_wander_box: 500.0,
            herd_footprint: 300.0,
            orphan_wander: 1000.0,
        }
    }
}

impl BehaviorParams {
    /// Check every parameter is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("leader_speed", self.leader_speed)?;
        non_negative("follower_speed", self.follower_speed)?;
        non_negative("leader_wander_box", self.leader_wander_box)?;
        non_negative("herd_footprint", self.herd_footprint)?;
        non_negative("orphan_wander", self.orphan_wander)?;
        rest_range("leader_rest_ticks", self.leader_rest_ticks)?;
        rest_range("follower_rest_ticks", self.follower_rest_ticks)?;
        Ok(())
    }

    /// Draw a leader rest countdown.
    pub fn sample_leader_rest<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        let (min, max) = self.leader_rest_ticks;
        rng.gen_range(min..=max)
    }

    /// Draw a follower rest countdown.
    pub fn sample_follower_rest<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        let (min, max) = self.follower_rest_ticks;
        rng.gen_range(min..=max)
    }
}

fn non_negative(name: &'static str, v: f64) -> Result<(), ConfigError> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            reason: format!("must be finite and non-negative, got {v}"),
        })
    }
}

fn rest_range(name: &'static str, (min, max): (u32, u32)) -> Result<(), ConfigError> {
    if min == 0 || min > max {
        return Err(ConfigError::InvalidRange {
            name,
            min: f64::from(min),
            max: f64::from(max),
        });
    }
    Ok(())
}
