//! The [`Behavior`] trait and the baseline herd policy.

use herd_core::Point;
use herd_world::WorldBounds;
use rand::RngCore;

use crate::params::BehaviorParams;
use crate::state::{BehaviorState, FollowerState, LeaderState, Motion};

/// What the coordinator resolved for one agent before the parallel phase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Guidance {
    /// Agent does not exist; leave it untouched.
    Dormant,
    /// Agent is a leader.
    Leader,
    /// Follower with no leader.
    Orphan,
    /// Follower whose leader sits at `anchor` (committed position).
    Herd {
        /// Leader position as of the previous commit.
        anchor: Point,
    },
}

/// Staged output of one behaviour step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Proposal {
    /// Position to commit, already clamped to the world.
    pub next: Point,
    /// State after this step.
    pub state: BehaviorState,
}

/// A per-agent behaviour policy.
///
/// Implementations must be pure functions of their inputs and the
/// supplied RNG so that a fixed seed and worker layout reproduce a run.
pub trait Behavior: Send + Sync + 'static {
    /// Human-readable name for logs.
    fn name(&self) -> &str;

    /// Compute the next position and state for one agent.
    fn propose(
        &self,
        motion: &Motion,
        guidance: Guidance,
        bounds: &WorldBounds,
        rng: &mut dyn RngCore,
    ) -> Proposal;
}

/// Leaders roam between random nearby targets with rest stops; followers
/// rest then wander to random points around their leader.
#[derive(Clone, Debug, Default)]
pub struct HerdBehavior {
    params: BehaviorParams,
}

impl HerdBehavior {
    /// Create a policy with `params`. Call [`BehaviorParams::validate`] first.
    pub fn new(params: BehaviorParams) -> Self {
        Self { params }
    }

    /// The active parameters.
    pub fn params(&self) -> &BehaviorParams {
        &self.params
    }

    fn step_leader(
        &self,
        pos: Point,
        speed: f64,
        state: LeaderState,
        bounds: &WorldBounds,
        rng: &mut dyn RngCore,
    ) -> (Point, LeaderState) {
        match state {
            LeaderState::Unset => {
                let target = bounds.sample_box(pos, self.params.leader_wander_box, rng);
                self.travel(pos, speed, target, rng)
            }
            LeaderState::Traveling { target } => self.travel(pos, speed, target, rng),
            LeaderState::Resting { ticks_remaining } => {
                let left = ticks_remaining.saturating_sub(1);
                if left == 0 {
                    let target = bounds.sample_box(pos, self.params.leader_wander_box, rng);
                    (pos, LeaderState::Traveling { target })
                } else {
                    (pos, LeaderState::Resting { ticks_remaining: left })
                }
            }
        }
    }

    fn travel(
        &self,
        pos: Point,
        speed: f64,
        target: Point,
        rng: &mut dyn RngCore,
    ) -> (Point, LeaderState) {
        let (next, arrived) = pos.step_toward(target, speed);
        if arrived {
            let ticks_remaining = self.params.sample_leader_rest(rng);
            (next, LeaderState::Resting { ticks_remaining })
        } else {
            (next, LeaderState::Traveling { target })
        }
    }

    fn step_follower(
        &self,
        pos: Point,
        speed: f64,
        state: FollowerState,
        anchor: Option<Point>,
        bounds: &WorldBounds,
        rng: &mut dyn RngCore,
    ) -> (Point, FollowerState) {
        match state {
            FollowerState::Unsettled => {
                let ticks_remaining = self.params.sample_follower_rest(rng);
                (pos, FollowerState::Resting { ticks_remaining })
            }
            FollowerState::Resting { ticks_remaining } => {
                let left = ticks_remaining.saturating_sub(1);
                if left > 0 {
                    return (pos, FollowerState::Resting { ticks_remaining: left });
                }
                let target = match anchor {
                    Some(a) => bounds.sample_box(a, self.params.herd_footprint, rng),
                    None => bounds.sample_box(pos, self.params.orphan_wander, rng),
                };
                (pos, FollowerState::Wandering { target })
            }
            FollowerState::Wandering { target } => {
                let (next, arrived) = pos.step_toward(target, speed);
                if arrived {
                    let ticks_remaining = self.params.sample_follower_rest(rng);
                    (next, FollowerState::Resting { ticks_remaining })
                } else {
                    (next, FollowerState::Wandering { target })
                }
            }
        }
    }
}

impl Behavior for HerdBehavior {
    fn name(&self) -> &str {
        "herd"
    }

    fn propose(
        &self,
        motion: &Motion,
        guidance: Guidance,
        bounds: &WorldBounds,
        rng: &mut dyn RngCore,
    ) -> Proposal {
        let pos = motion.position;
        let (next, state) = match (motion.state, guidance) {
            (_, Guidance::Dormant) => (pos, motion.state),
            (BehaviorState::Leader(s), _) => {
                let (p, s) = self.step_leader(pos, motion.speed, s, bounds, rng);
                (p, BehaviorState::Leader(s))
            }
            (BehaviorState::Follower(s), g) => {
                let anchor = match g {
                    Guidance::Herd { anchor } => Some(anchor),
                    _ => None,
                };
                let (p, s) = self.step_follower(pos, motion.speed, s, anchor, bounds, rng);
                (p, BehaviorState::Follower(s))
            }
        };
        Proposal {
            next: bounds.clamp(next),
            state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use herd_core::Role;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn world() -> WorldBounds {
        WorldBounds::new(1000.0, 1000.0).unwrap()
    }

    fn params() -> BehaviorParams {
        BehaviorParams {
            leader_speed: 10.0,
            follower_speed: 20.0,
            leader_rest_ticks: (3, 3),
            follower_rest_ticks: (2, 2),
            leader_wander_box: 100.0,
            herd_footprint: 50.0,
            orphan_wander: 200.0,
        }
    }

    fn run(b: &HerdBehavior, m: &mut Motion, g: Guidance, rng: &mut ChaCha8Rng) {
        let p = b.propose(m, g, &world(), rng);
        m.position = p.next;
        m.next = p.next;
        m.state = p.state;
    }

    #[test]
    fn dormant_agent_is_untouched() {
        let b = HerdBehavior::new(params());
        let m = Motion::new(Role::Follower, Point::new(5.0, 5.0), 20.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let p = b.propose(&m, Guidance::Dormant, &world(), &mut rng);
        assert_eq!(p.next, m.position);
        assert_eq!(p.state, m.state);
    }

    #[test]
    fn unset_leader_moves_on_its_first_step() {
        let b = HerdBehavior::new(params());
        let start = Point::new(500.0, 500.0);
        let m = Motion::new(Role::Leader, start, 10.0);
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let p = b.propose(&m, Guidance::Leader, &world(), &mut rng);
            assert_ne!(p.next, start, "seed {seed}");
            assert!(p.next.distance(start) <= 10.0 + 1e-9);
            match p.state {
                BehaviorState::Leader(LeaderState::Traveling { target }) => {
                    assert!((target.x - 500.0).abs() <= 100.0);
                    assert!((target.y - 500.0).abs() <= 100.0);
                    assert!((p.next.distance(start) - 10.0).abs() < 1e-9);
                }
                BehaviorState::Leader(LeaderState::Resting { ticks_remaining }) => {
                    assert_eq!(ticks_remaining, 3);
                }
                other => panic!("unexpected state {other:?}"),
            }
        }
    }

    #[test]
    fn traveling_leader_moves_by_speed_then_rests() {
        let b = HerdBehavior::new(params());
        let mut m = Motion::new(Role::Leader, Point::new(0.0, 0.0), 10.0);
        m.state = BehaviorState::Leader(LeaderState::Traveling {
            target: Point::new(25.0, 0.0),
        });
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        run(&b, &mut m, Guidance::Leader, &mut rng);
        assert!((m.position.x - 10.0).abs() < 1e-9);
        run(&b, &mut m, Guidance::Leader, &mut rng);
        assert!((m.position.x - 20.0).abs() < 1e-9);
        run(&b, &mut m, Guidance::Leader, &mut rng);
        assert_eq!(m.position, Point::new(25.0, 0.0));
        assert_eq!(
            m.state,
            BehaviorState::Leader(LeaderState::Resting { ticks_remaining: 3 })
        );
    }

    #[test]
    fn resting_leader_holds_then_departs() {
        let b = HerdBehavior::new(params());
        let mut m = Motion::new(Role::Leader, Point::new(300.0, 300.0), 10.0);
        m.state = BehaviorState::Leader(LeaderState::Resting { ticks_remaining: 2 });
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        run(&b, &mut m, Guidance::Leader, &mut rng);
        assert_eq!(m.position, Point::new(300.0, 300.0));
        assert_eq!(
            m.state,
            BehaviorState::Leader(LeaderState::Resting { ticks_remaining: 1 })
        );
        run(&b, &mut m, Guidance::Leader, &mut rng);
        assert_eq!(m.position, Point::new(300.0, 300.0));
        assert!(matches!(
            m.state,
            BehaviorState::Leader(LeaderState::Traveling { .. })
        ));
    }

    #[test]
    fn follower_wanders_near_its_leader() {
        let b = HerdBehavior::new(params());
        let mut m = Motion::new(Role::Follower, Point::new(100.0, 100.0), 20.0);
        m.state = BehaviorState::Follower(FollowerState::Resting { ticks_remaining: 1 });
        let anchor = Point::new(700.0, 700.0);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        run(&b, &mut m, Guidance::Herd { anchor }, &mut rng);
        match m.state {
            BehaviorState::Follower(FollowerState::Wandering { target }) => {
                assert!((target.x - 700.0).abs() <= 50.0);
                assert!((target.y - 700.0).abs() <= 50.0);
            }
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn unsettled_follower_gets_fresh_countdown() {
        let b = HerdBehavior::new(params());
        let m = Motion::new(Role::Follower, Point::new(1.0, 1.0), 20.0);
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let p = b.propose(&m, Guidance::Orphan, &world(), &mut rng);
        assert_eq!(
            p.state,
            BehaviorState::Follower(FollowerState::Resting { ticks_remaining: 2 })
        );
    }

    #[test]
    fn same_seed_same_proposal() {
        let b = HerdBehavior::new(params());
        let mut m = Motion::new(Role::Leader, Point::new(10.0, 10.0), 10.0);
        m.state = BehaviorState::Leader(LeaderState::Resting { ticks_remaining: 1 });
        let a = b.propose(&m, Guidance::Leader, &world(), &mut ChaCha8Rng::seed_from_u64(9));
        let c = b.propose(&m, Guidance::Leader, &world(), &mut ChaCha8Rng::seed_from_u64(9));
        assert_eq!(a, c);
    }

    proptest! {
        #[test]
        fn proposals_stay_in_bounds(
            x in 0.0f64..1000.0,
            y in 0.0f64..1000.0,
            tx in -5000.0f64..5000.0,
            ty in -5000.0f64..5000.0,
            seed in any::<u64>(),
        ) {
            let b = HerdBehavior::new(params());
            let mut m = Motion::new(Role::Follower, Point::new(x, y), 20.0);
            m.state = BehaviorState::Follower(FollowerState::Wandering {
                target: Point::new(tx, ty),
            });
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let p = b.propose(&m, Guidance::Orphan, &world(), &mut rng);
            prop_assert!(world().contains(p.next));
            prop_assert_eq!(p.state.role(), Role::Follower);
        }
    }
}
