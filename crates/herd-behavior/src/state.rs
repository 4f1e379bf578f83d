//! Behaviour states and the per-agent mutable motion record.

use std::fmt;

use herd_core::{Point, Role};

/// States a leader can occupy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LeaderState {
    /// Freshly created; picks a spawn-adjacent target and starts toward
    /// it on its first step.
    Unset,
    /// Walking toward `target`.
    Traveling {
        /// Destination.
        target: Point,
    },
    /// Holding position until the countdown reaches zero.
    Resting {
        /// Ticks left before picking a new target.
        ticks_remaining: u32,
    },
}

/// States a follower can occupy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FollowerState {
    /// Needs a fresh rest countdown; collapses into `Resting` on its
    /// next step. Used at creation and after the follower is rehomed.
    Unsettled,
    /// Holding position until the countdown reaches zero.
    Resting {
        /// Ticks left before picking a wander target.
        ticks_remaining: u32,
    },
    /// Walking toward a point near its leader (or near itself if orphaned).
    Wandering {
        /// Destination.
        target: Point,
    },
}

/// Role-tagged behaviour state.
///
/// The outer variant fixes the role, so a leader can never hold a
/// follower state or the reverse.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BehaviorState {
    /// Leader state family.
    Leader(LeaderState),
    /// Follower state family.
    Follower(FollowerState),
}

impl BehaviorState {
    /// Initial state for a new agent of `role`.
    pub fn initial(role: Role) -> Self {
        match role {
            Role::Leader => Self::Leader(LeaderState::Unset),
            Role::Follower => Self::Follower(FollowerState::Unsettled),
        }
    }

    /// The role this state belongs to.
    pub fn role(&self) -> Role {
        match self {
            Self::Leader(_) => Role::Leader,
            Self::Follower(_) => Role::Follower,
        }
    }

    /// Display label.
    pub fn label(&self) -> StateLabel {
        match self {
            Self::Leader(LeaderState::Unset) => StateLabel::LeaderIdle,
            Self::Leader(LeaderState::Traveling { .. }) => StateLabel::Traveling,
            Self::Leader(LeaderState::Resting { .. }) => StateLabel::Resting,
            Self::Follower(FollowerState::Unsettled) => StateLabel::Unsettled,
            Self::Follower(FollowerState::Resting { .. }) => StateLabel::Resting,
            Self::Follower(FollowerState::Wandering { .. }) => StateLabel::Wandering,
        }
    }
}

/// Short state name handed to renderers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StateLabel {
    /// Leader without a target yet.
    LeaderIdle,
    /// Leader moving toward its target.
    Traveling,
    /// Leader or follower counting down in place.
    Resting,
    /// Follower moving toward its wander target.
    Wandering,
    /// Follower waiting for a fresh countdown.
    Unsettled,
}

impl fmt::Display for StateLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::LeaderIdle => "leader_idle",
            Self::Traveling => "traveling",
            Self::Resting => "resting",
            Self::Wandering => "wandering",
            Self::Unsettled => "unsettled",
        };
        f.write_str(s)
    }
}

/// Per-agent fields a worker task may write during the parallel phase.
///
/// `position` is the committed position from the previous tick and is
/// only overwritten by the commit phase. Behaviour writes go to `next`
/// and `state`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Motion {
    /// Committed position.
    pub position: Point,
    /// Staged position, copied into `position` at commit.
    pub next: Point,
    /// Distance covered per tick while moving.
    pub speed: f64,
    /// Current behaviour state.
    pub state: BehaviorState,
}

impl Motion {
    /// A motion record at rest at `position` in the initial state for `role`.
    pub fn new(role: Role, position: Point, speed: f64) -> Self {
        Self {
            position,
            next: position,
            speed,
            state: BehaviorState::initial(role),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_matches_role() {
        assert_eq!(BehaviorState::initial(Role::Leader).role(), Role::Leader);
        assert_eq!(BehaviorState::initial(Role::Follower).role(), Role::Follower);
    }

    #[test]
    fn labels_render_snake_case() {
        let s = BehaviorState::Leader(LeaderState::Traveling {
            target: Point::new(1.0, 2.0),
        });
        assert_eq!(s.label().to_string(), "traveling");
        assert_eq!(StateLabel::LeaderIdle.to_string(), "leader_idle");
    }
}
