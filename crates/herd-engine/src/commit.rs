//! Serial commit phase: staged positions become committed positions.

use rand::Rng;

use herd_arena::AgentStore;
use herd_world::TerrainGrid;

/// Copy every live agent's staged position into its committed position.
///
/// Positions are clamped to the world. An agent whose new position is
/// impassable is moved to a random passable point in the same pass.
/// Returns how many agents were moved that way.
pub(crate) fn commit<R: Rng + ?Sized>(
    store: &mut AgentStore,
    terrain: &TerrainGrid,
    rng: &mut R,
) -> usize {
    let bounds = *terrain.bounds();
    let (agents, motion) = store.columns_mut();
    let mut relocations = 0;
    for (agent, m) in agents.iter().zip(motion.iter_mut()) {
        if !agent.exists() {
            continue;
        }
        let mut p = bounds.clamp(m.next);
        if !terrain.terrain_at(p).is_passable() {
            p = match terrain.passable_point(rng) {
                Some(q) => q,
                None => bounds.sample(rng),
            };
            relocations += 1;
            log::trace!("agent {} relocated off impassable terrain", agent.id());
        }
        m.position = p;
        m.next = p;
    }
    relocations
}
