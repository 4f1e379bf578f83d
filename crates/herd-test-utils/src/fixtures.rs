//! Reusable behaviour and store fixtures.
//!
//! - [`scenario_params`]: behaviour tuned for a 1000x1000 world.
//! - [`FrozenBehavior`]: every agent holds position and state.
//! - [`PanicBehavior`]: panics on the first proposal.
//! - [`store_with`]: a store of leaders then followers on a line.

use herd_arena::{AgentSpec, AgentStore};
use herd_behavior::{Behavior, BehaviorParams, Guidance, Motion, Proposal};
use herd_core::{Point, Role};
use herd_world::WorldBounds;
use rand::RngCore;

/// Behaviour parameters sized for a 1000x1000 world: short rests so
/// every leader cycles through travelling and resting within a few
/// hundred ticks.
pub fn scenario_params() -> BehaviorParams {
    BehaviorParams {
        leader_speed: 5.0,
        follower_speed: 8.0,
        leader_rest_ticks: (5, 30),
        follower_rest_ticks: (3, 20),
        leader_wander_box: 200.0,
        herd_footprint: 80.0,
        orphan_wander: 1000.0,
    }
}

/// Holds every agent exactly where it is.
pub struct FrozenBehavior;

impl Behavior for FrozenBehavior {
    fn name(&self) -> &str {
        "frozen"
    }

    fn propose(
        &self,
        motion: &Motion,
        _guidance: Guidance,
        bounds: &WorldBounds,
        _rng: &mut dyn RngCore,
    ) -> Proposal {
        Proposal {
            next: bounds.clamp(motion.position),
            state: motion.state,
        }
    }
}

/// Panics on the first proposal, killing its worker.
pub struct PanicBehavior;

impl Behavior for PanicBehavior {
    fn name(&self) -> &str {
        "panic"
    }

    fn propose(
        &self,
        _motion: &Motion,
        _guidance: Guidance,
        _bounds: &WorldBounds,
        _rng: &mut dyn RngCore,
    ) -> Proposal {
        panic!("injected behaviour failure");
    }
}

/// `leaders` leaders then `followers` followers, spaced 10 units apart
/// along `y = 0`, all unlinked.
pub fn store_with(leaders: usize, followers: usize) -> AgentStore {
    let mut store = AgentStore::with_capacity(leaders + followers);
    for i in 0..leaders + followers {
        let role = if i < leaders {
            Role::Leader
        } else {
            Role::Follower
        };
        store.spawn(AgentSpec {
            role,
            position: Point::new(i as f64 * 10.0, 0.0),
            speed: 1.0,
            radius: 1.0,
            personal_space: 1.0,
        });
    }
    store
}
