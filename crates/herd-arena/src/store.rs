//! The agent store: identity column, motion column and id index.

use indexmap::IndexMap;

use herd_behavior::Motion;
use herd_core::{AgentId, HerdColor, Point, Role};

use crate::error::StoreError;
use crate::partition::{partition_ranges, MotionChunk};

/// Creation parameters for one agent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentSpec {
    /// Leader or follower. Fixed for the run.
    pub role: Role,
    /// Spawn position.
    pub position: Point,
    /// Movement per tick.
    pub speed: f64,
    /// Render and personal-space radius.
    pub radius: f64,
    /// Personal-space tolerance factor (followers only; ignored for leaders).
    pub personal_space: f64,
}

/// Identity and topology of one agent.
///
/// The leader link and colour are private: they change only through
/// [`AgentStore::link`] and [`AgentStore::unlink`], which keep them
/// consistent with each other.
#[derive(Clone, Debug, PartialEq)]
pub struct Agent {
    id: AgentId,
    role: Role,
    radius: f64,
    personal_space: f64,
    exists: bool,
    leader: Option<AgentId>,
    color: Option<HerdColor>,
}

impl Agent {
    /// Unique id.
    pub fn id(&self) -> AgentId {
        self.id
    }

    /// Role, fixed at creation.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Shorthand for `role().is_leader()`.
    pub fn is_leader(&self) -> bool {
        self.role.is_leader()
    }

    /// Render and personal-space radius.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Personal-space tolerance factor. Zero for leaders.
    pub fn personal_space(&self) -> f64 {
        self.personal_space
    }

    /// False once soft-deleted.
    pub fn exists(&self) -> bool {
        self.exists
    }

    /// The raw leader link, unvalidated. See [`AgentStore::leader_of`].
    pub fn leader(&self) -> Option<AgentId> {
        self.leader
    }

    /// Herd colour key. Leaders carry their own; orphans have none.
    pub fn color(&self) -> Option<HerdColor> {
        self.color
    }
}

/// Single owner of every agent in a run.
///
/// Index `i` refers to the same agent for the whole run. Agent ids are
/// assigned from [`AgentId::FIRST`] in creation order, so index order
/// and id order coincide.
#[derive(Clone, Debug, Default)]
pub struct AgentStore {
    agents: Vec<Agent>,
    motion: Vec<Motion>,
    index: IndexMap<AgentId, usize>,
    next_id: Option<AgentId>,
}

impl AgentStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty store with room for `capacity` agents.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            agents: Vec::with_capacity(capacity),
            motion: Vec::with_capacity(capacity),
            index: IndexMap::with_capacity(capacity),
            next_id: None,
        }
    }

    /// Create an agent and return its id.
    ///
    /// Leaders are created with their own herd colour. Followers start
    /// unlinked.
    pub fn spawn(&mut self, spec: AgentSpec) -> AgentId {
        let id = self.next_id.unwrap_or(AgentId::FIRST);
        self.next_id = Some(id.next());

        let (personal_space, color) = match spec.role {
            Role::Leader => (0.0, Some(HerdColor::for_leader(id))),
            Role::Follower => (spec.personal_space, None),
        };
        let idx = self.agents.len();
        self.agents.push(Agent {
            id,
            role: spec.role,
            radius: spec.radius,
            personal_space,
            exists: true,
            leader: None,
            color,
        });
        self.motion
            .push(Motion::new(spec.role, spec.position, spec.speed));
        self.index.insert(id, idx);
        id
    }

    /// Number of agents ever created, live or not.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether no agent was ever created.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Agent at `index`.
    pub fn agent(&self, index: usize) -> Option<&Agent> {
        self.agents.get(index)
    }

    /// The identity column.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Motion record at `index`.
    pub fn motion(&self, index: usize) -> Option<&Motion> {
        self.motion.get(index)
    }

    /// Mutable motion record at `index`.
    pub fn motion_mut(&mut self, index: usize) -> Option<&mut Motion> {
        self.motion.get_mut(index)
    }

    /// The motion column.
    pub fn motions(&self) -> &[Motion] {
        &self.motion
    }

    /// Both columns, identity read-only.
    pub fn columns_mut(&mut self) -> (&[Agent], &mut [Motion]) {
        (&self.agents, &mut self.motion)
    }

    /// Index of the agent with `id`.
    pub fn index_of(&self, id: AgentId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Whether `id` names a live leader.
    pub fn is_live_leader(&self, id: AgentId) -> bool {
        self.index_of(id)
            .map(|i| &self.agents[i])
            .is_some_and(|a| a.exists && a.is_leader())
    }

    /// The validated leader of the agent at `index`.
    ///
    /// Returns `None` when the agent has no link or when the link names
    /// an agent that is unknown, soft-deleted or not a leader.
    pub fn leader_of(&self, index: usize) -> Option<AgentId> {
        let leader = self.agents.get(index)?.leader?;
        self.is_live_leader(leader).then_some(leader)
    }

    /// Committed position of the live leader `id`.
    pub fn leader_position(&self, id: AgentId) -> Option<Point> {
        let i = self.index_of(id)?;
        let a = &self.agents[i];
        if a.exists && a.is_leader() {
            self.motion.get(i).map(|m| m.position)
        } else {
            None
        }
    }

    /// Live leaders with their committed positions, in id order.
    pub fn live_leaders(&self) -> Vec<(AgentId, Point)> {
        self.agents
            .iter()
            .zip(&self.motion)
            .filter(|(a, _)| a.exists && a.is_leader())
            .map(|(a, m)| (a.id, m.position))
            .collect()
    }

    /// Live follower count for every live leader, in id order.
    pub fn herd_sizes(&self) -> IndexMap<AgentId, usize> {
        let mut sizes: IndexMap<AgentId, usize> = self
            .agents
            .iter()
            .filter(|a| a.exists && a.is_leader())
            .map(|a| (a.id, 0))
            .collect();
        for a in self.agents.iter().filter(|a| a.exists && !a.is_leader()) {
            if let Some(n) = a.leader.and_then(|l| sizes.get_mut(&l)) {
                *n += 1;
            }
        }
        sizes
    }

    /// Link `follower` to `leader` and adopt the leader's herd colour.
    pub fn link(&mut self, follower: AgentId, leader: AgentId) -> Result<(), StoreError> {
        let fi = self
            .index_of(follower)
            .ok_or(StoreError::UnknownAgent(follower))?;
        if self.agents[fi].is_leader() {
            return Err(StoreError::NotAFollower(follower));
        }
        if self.index_of(leader).is_none() {
            return Err(StoreError::UnknownAgent(leader));
        }
        if !self.is_live_leader(leader) {
            return Err(StoreError::NotALeader(leader));
        }
        let a = &mut self.agents[fi];
        a.leader = Some(leader);
        a.color = Some(HerdColor::for_leader(leader));
        Ok(())
    }

    /// Clear `follower`'s link and colour. Returns the previous raw link.
    pub fn unlink(&mut self, follower: AgentId) -> Result<Option<AgentId>, StoreError> {
        let fi = self
            .index_of(follower)
            .ok_or(StoreError::UnknownAgent(follower))?;
        let a = &mut self.agents[fi];
        if a.is_leader() {
            return Err(StoreError::NotAFollower(follower));
        }
        a.color = None;
        Ok(a.leader.take())
    }

    /// Overwrite `follower`'s leader link without validating the target.
    ///
    /// For fault injection only: the link may name a dead agent, a
    /// follower or an unknown id. The colour is left as it was. The
    /// repair passes treat such a link as unset.
    pub fn set_raw_leader(
        &mut self,
        follower: AgentId,
        leader: Option<AgentId>,
    ) -> Result<(), StoreError> {
        let fi = self
            .index_of(follower)
            .ok_or(StoreError::UnknownAgent(follower))?;
        if self.agents[fi].is_leader() {
            return Err(StoreError::NotAFollower(follower));
        }
        self.agents[fi].leader = leader;
        Ok(())
    }

    /// Soft-delete `id`. Its index stays occupied.
    ///
    /// Despawning a leader unlinks every follower that pointed at it.
    /// Despawning an already dead agent is a no-op.
    pub fn despawn(&mut self, id: AgentId) -> Result<(), StoreError> {
        let i = self.index_of(id).ok_or(StoreError::UnknownAgent(id))?;
        if !self.agents[i].exists {
            return Ok(());
        }
        self.agents[i].exists = false;
        if self.agents[i].is_leader() {
            for a in self.agents.iter_mut().filter(|a| a.leader == Some(id)) {
                a.leader = None;
                a.color = None;
            }
        } else {
            self.agents[i].leader = None;
            self.agents[i].color = None;
        }
        Ok(())
    }

    /// Move the motion column out in `workers` contiguous chunks.
    ///
    /// Until [`restore_chunks`](Self::restore_chunks) the motion column
    /// is empty.
    pub fn take_chunks(&mut self, workers: usize) -> Vec<MotionChunk> {
        let mut all = std::mem::take(&mut self.motion);
        let ranges = partition_ranges(all.len(), workers);
        let mut chunks = Vec::with_capacity(ranges.len());
        for r in ranges.iter().rev() {
            let motion = all.split_off(r.start);
            chunks.push(MotionChunk {
                start: r.start,
                motion,
            });
        }
        chunks.reverse();
        chunks
    }

    /// Stitch chunks from [`take_chunks`](Self::take_chunks) back in.
    ///
    /// Chunks must be in start order and cover every index exactly once.
    pub fn restore_chunks(&mut self, chunks: Vec<MotionChunk>) -> Result<(), StoreError> {
        let mut motion = Vec::with_capacity(self.agents.len());
        for chunk in chunks {
            if chunk.start != motion.len() {
                return Err(StoreError::ChunkMismatch {
                    expected: motion.len(),
                    found: chunk.start,
                });
            }
            motion.extend(chunk.motion);
        }
        if motion.len() != self.agents.len() {
            return Err(StoreError::ChunkMismatch {
                expected: self.agents.len(),
                found: motion.len(),
            });
        }
        self.motion = motion;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(role: Role, x: f64) -> AgentSpec {
        AgentSpec {
            role,
            position: Point::new(x, 0.0),
            speed: 1.0,
            radius: 2.0,
            personal_space: 1.5,
        }
    }

    fn herd() -> (AgentStore, AgentId, AgentId, AgentId) {
        let mut s = AgentStore::new();
        let l1 = s.spawn(spec(Role::Leader, 0.0));
        let l2 = s.spawn(spec(Role::Leader, 10.0));
        let f = s.spawn(spec(Role::Follower, 5.0));
        (s, l1, l2, f)
    }

    #[test]
    fn ids_are_sequential_from_one() {
        let (s, l1, l2, f) = herd();
        assert_eq!((l1, l2, f), (AgentId(1), AgentId(2), AgentId(3)));
        assert_eq!(s.index_of(f), Some(2));
        assert_eq!(s.index_of(AgentId(99)), None);
    }

    #[test]
    fn leaders_carry_their_own_color() {
        let (s, l1, _, f) = herd();
        assert_eq!(s.agent(0).unwrap().color(), Some(HerdColor::for_leader(l1)));
        assert_eq!(s.agent(s.index_of(f).unwrap()).unwrap().color(), None);
        assert_eq!(s.agent(0).unwrap().personal_space(), 0.0);
    }

    #[test]
    fn link_sets_color_and_unlink_clears_it() {
        let (mut s, _, l2, f) = herd();
        s.link(f, l2).unwrap();
        assert_eq!(s.leader_of(2), Some(l2));
        assert_eq!(s.agent(2).unwrap().color(), Some(HerdColor::for_leader(l2)));
        assert_eq!(s.unlink(f).unwrap(), Some(l2));
        assert_eq!(s.leader_of(2), None);
        assert_eq!(s.agent(2).unwrap().color(), None);
    }

    #[test]
    fn link_rejects_wrong_roles() {
        let (mut s, l1, l2, f) = herd();
        assert_eq!(s.link(l1, l2), Err(StoreError::NotAFollower(l1)));
        assert_eq!(s.link(f, f), Err(StoreError::NotALeader(f)));
        assert_eq!(
            s.link(f, AgentId(42)),
            Err(StoreError::UnknownAgent(AgentId(42)))
        );
    }

    #[test]
    fn despawned_leader_releases_its_herd() {
        let (mut s, l1, _, f) = herd();
        s.link(f, l1).unwrap();
        s.despawn(l1).unwrap();
        assert!(!s.agent(0).unwrap().exists());
        assert_eq!(s.agent(2).unwrap().leader(), None);
        assert_eq!(s.live_leaders().len(), 1);
        assert_eq!(s.link(f, l1), Err(StoreError::NotALeader(l1)));
    }

    #[test]
    fn raw_link_to_a_follower_is_not_a_leader() {
        let (mut s, l1, _, f) = herd();
        let g = s.spawn(spec(Role::Follower, 7.0));
        s.set_raw_leader(f, Some(g)).unwrap();
        assert_eq!(s.agent(2).unwrap().leader(), Some(g));
        assert_eq!(s.leader_of(2), None);
        assert_eq!(s.herd_sizes().get(&l1), Some(&0));
        assert_eq!(s.set_raw_leader(l1, None), Err(StoreError::NotAFollower(l1)));
    }

    #[test]
    fn herd_sizes_count_live_followers() {
        let (mut s, l1, l2, f) = herd();
        let g = s.spawn(spec(Role::Follower, 7.0));
        s.link(f, l1).unwrap();
        s.link(g, l1).unwrap();
        let sizes = s.herd_sizes();
        assert_eq!(sizes.get(&l1), Some(&2));
        assert_eq!(sizes.get(&l2), Some(&0));
        s.despawn(g).unwrap();
        assert_eq!(s.herd_sizes().get(&l1), Some(&1));
    }

    #[test]
    fn chunks_round_trip_in_order() {
        let mut s = AgentStore::new();
        for i in 0..10 {
            s.spawn(spec(Role::Follower, f64::from(i)));
        }
        let before = s.motions().to_vec();
        let chunks = s.take_chunks(3);
        assert_eq!(chunks.len(), 3);
        assert!(s.motions().is_empty());
        s.restore_chunks(chunks).unwrap();
        assert_eq!(s.motions(), &before[..]);
    }

    #[test]
    fn restore_rejects_missing_chunk() {
        let mut s = AgentStore::new();
        for i in 0..6 {
            s.spawn(spec(Role::Follower, f64::from(i)));
        }
        let mut chunks = s.take_chunks(3);
        chunks.remove(1);
        assert_eq!(
            s.restore_chunks(chunks),
            Err(StoreError::ChunkMismatch {
                expected: 2,
                found: 4
            })
        );
    }
}
