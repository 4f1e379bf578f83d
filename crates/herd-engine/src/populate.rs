//! Building the world and the initial population.

use rand::Rng;

use herd_arena::{AgentSpec, AgentStore};
use herd_core::{ConfigError, Role};
use herd_world::{PatchReport, TerrainGrid, WorldBounds};

use crate::config::SimConfig;
use crate::membership::assign_nearest;

/// Terrain plus population, fresh from a config.
pub(crate) struct Populated {
    pub terrain: TerrainGrid,
    pub store: AgentStore,
    pub patches: PatchReport,
    pub leaders: usize,
}

/// Build the terrain grid, scatter patches and create every agent.
///
/// Leaders are created first, so they hold ids `1..=leaders`. Spawn
/// points are drawn on passable terrain. Every follower is linked to
/// its nearest leader before returning.
pub(crate) fn populate<R: Rng + ?Sized>(
    config: &SimConfig,
    rng: &mut R,
) -> Result<Populated, ConfigError> {
    let bounds = WorldBounds::new(config.world_width, config.world_height)?;
    let mut terrain = TerrainGrid::new(bounds, config.terrain_cols, config.terrain_rows)?;
    let patches = terrain.scatter_patches(config.terrain_patches, rng);

    let leaders = config.leader_count();
    let (rmin, rmax) = config.radius;
    let mut store = AgentStore::with_capacity(config.population);
    for i in 0..config.population {
        let role = if i < leaders {
            Role::Leader
        } else {
            Role::Follower
        };
        let position = match terrain.passable_point(rng) {
            Some(p) => p,
            None => bounds.sample(rng),
        };
        let speed = match role {
            Role::Leader => config.behavior.leader_speed,
            Role::Follower => config.behavior.follower_speed,
        };
        store.spawn(AgentSpec {
            role,
            position,
            speed,
            radius: rng.gen_range(rmin..=rmax),
            personal_space: rng.gen_range(1.0..=config.personal_space_max),
        });
    }
    let linked = assign_nearest(&mut store);
    log::debug!("populated {} agents, {leaders} leaders, {linked} followers linked", store.len());

    Ok(Populated {
        terrain,
        store,
        patches,
        leaders,
    })
}
