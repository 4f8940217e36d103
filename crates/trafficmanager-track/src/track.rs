//! The shared occupancy registry.
//!
//! `TrackTraffic` answers "who else is here?" for a waypoint or a grid cell
//! without a pairwise scan over agents. It is the one piece of state every
//! pipeline stage shares, so each of its four maps is key-partitioned and no
//! operation ever holds a registry-wide lock.
//!
//! Lock order, for operations touching more than one map:
//! 1. a waypoint shard, then overlap shards (two at most, ascending index);
//! 2. an agent-to-grid shard, then one grid-to-agent shard.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use ahash::{AHashMap, AHashSet};
use trafficmanager_waypoint::{AgentId, GridCell, GridId, WaypointKey};

use crate::config::TrackTrafficConfig;
use crate::sharded::ShardedMap;
use crate::stats::{GridIndexSnapshot, TrackTrafficStats};

/// Overlap links, counted by the number of waypoints the pair shares.
type LinkCounts = AHashMap<AgentId, u32>;

/// Shared registry of waypoint and grid-cell occupancy.
pub struct TrackTraffic {
    waypoint_overlap: ShardedMap<WaypointKey, AHashSet<AgentId>>,
    overlapping_agents: ShardedMap<AgentId, LinkCounts>,
    agent_to_grids: ShardedMap<AgentId, AHashSet<GridId>>,
    grid_to_agents: ShardedMap<GridId, AHashSet<AgentId>>,
}

impl TrackTraffic {
    /// Create an empty registry with the default shard count.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&TrackTrafficConfig::default())
    }

    /// Create an empty registry.
    ///
    /// An out-of-range shard count is clamped; use
    /// [`TrackTrafficConfig::validate`] to reject it instead.
    #[must_use]
    pub fn with_config(config: &TrackTrafficConfig) -> Self {
        let shards = config.effective_shard_count();
        Self {
            waypoint_overlap: ShardedMap::new(shards),
            overlapping_agents: ShardedMap::new(shards),
            agent_to_grids: ShardedMap::new(shards),
            grid_to_agents: ShardedMap::new(shards),
        }
    }

    /// Shards per map.
    #[must_use]
    pub fn shard_count(&self) -> usize {
        self.waypoint_overlap.shard_count()
    }

    /// Record that `agent`'s path passes through `waypoint`.
    ///
    /// The agent is linked with every other current occupant. Recording the
    /// same pair twice changes nothing.
    pub fn record_passage(&self, waypoint: WaypointKey, agent: AgentId) {
        let mut shard = self.waypoint_overlap.write(&waypoint);
        let occupants = shard.entry(waypoint).or_default();
        if !occupants.insert(agent) {
            return;
        }
        for &other in occupants.iter().filter(|&&other| other != agent) {
            self.adjust_link(agent, other, LinkChange::Add);
        }
    }

    /// Forget that `agent`'s path passes through `waypoint`.
    ///
    /// Empty waypoint entries are pruned. Removing a passage that was never
    /// recorded is a no-op.
    pub fn remove_passage(&self, waypoint: WaypointKey, agent: AgentId) {
        let mut shard = self.waypoint_overlap.write(&waypoint);
        let Some(occupants) = shard.get_mut(&waypoint) else {
            return;
        };
        if !occupants.remove(&agent) {
            return;
        }
        for &other in occupants.iter() {
            self.adjust_link(agent, other, LinkChange::Release);
        }
        if occupants.is_empty() {
            shard.remove(&waypoint);
        }
    }

    /// Agents whose paths pass through `waypoint`.
    #[must_use]
    pub fn passing_agents(&self, waypoint: WaypointKey) -> HashSet<AgentId> {
        self.waypoint_overlap
            .read(&waypoint)
            .get(&waypoint)
            .map(|occupants| occupants.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Agents sharing at least one recorded waypoint with `agent`.
    #[must_use]
    pub fn waypoint_overlaps(&self, agent: AgentId) -> HashSet<AgentId> {
        self.overlapping_agents
            .read(&agent)
            .get(&agent)
            .map(|links| links.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Place `agent` in the grid cell of `waypoint`.
    pub fn update_grid_position(&self, agent: AgentId, waypoint: &impl GridCell) {
        let grid = waypoint.grid_id();
        let mut grids = self.agent_to_grids.write(&agent);
        let mut members = self.grid_to_agents.write(&grid);
        grids.entry(agent).or_default().insert(grid);
        members.entry(grid).or_default().insert(agent);
    }

    /// Take `agent` out of the grid cell of `removed`.
    ///
    /// When `remaining` (the next waypoint still on the agent's path) lies in
    /// the same cell the agent stays registered there.
    pub fn remove_grid_position(
        &self,
        agent: AgentId,
        removed: &impl GridCell,
        remaining: Option<&dyn GridCell>,
    ) {
        let grid = removed.grid_id();
        if remaining.is_some_and(|next| next.grid_id() == grid) {
            return;
        }

        let mut grids = self.agent_to_grids.write(&agent);
        let mut members = self.grid_to_agents.write(&grid);
        if let Some(agent_grids) = grids.get_mut(&agent) {
            agent_grids.remove(&grid);
            if agent_grids.is_empty() {
                grids.remove(&agent);
            }
        }
        if let Some(grid_members) = members.get_mut(&grid) {
            grid_members.remove(&agent);
            if grid_members.is_empty() {
                members.remove(&grid);
            }
        }
    }

    /// Other agents sharing at least one grid cell with `agent`.
    #[must_use]
    pub fn overlapping_agents(&self, agent: AgentId) -> HashSet<AgentId> {
        let grids = self.agent_to_grids.read(&agent);
        let Some(agent_grids) = grids.get(&agent) else {
            return HashSet::new();
        };

        let mut overlapping = HashSet::new();
        for grid in agent_grids {
            if let Some(members) = self.grid_to_agents.read(grid).get(grid) {
                overlapping.extend(members.iter().copied().filter(|&other| other != agent));
            }
        }
        overlapping
    }

    /// Grid cells `agent` currently occupies.
    #[must_use]
    pub fn grids_of(&self, agent: AgentId) -> HashSet<GridId> {
        self.agent_to_grids
            .read(&agent)
            .get(&agent)
            .map(|grids| grids.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Agents currently in `grid`.
    #[must_use]
    pub fn agents_in_grid(&self, grid: GridId) -> HashSet<AgentId> {
        self.grid_to_agents
            .read(&grid)
            .get(&grid)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Drop every trace of a destroyed agent.
    pub fn remove_agent(&self, agent: AgentId) {
        let mut released_waypoints = 0_usize;
        for shard in self.waypoint_overlap.shards() {
            let mut shard = shard.write();
            shard.retain(|_, occupants| {
                if occupants.remove(&agent) {
                    released_waypoints += 1;
                    for &other in occupants.iter() {
                        self.adjust_link(agent, other, LinkChange::Release);
                    }
                }
                !occupants.is_empty()
            });
        }

        let mut grids = self.agent_to_grids.write(&agent);
        let agent_grids = grids.remove(&agent).unwrap_or_default();
        for grid in &agent_grids {
            let mut members = self.grid_to_agents.write(grid);
            if let Some(grid_members) = members.get_mut(grid) {
                grid_members.remove(&agent);
                if grid_members.is_empty() {
                    members.remove(grid);
                }
            }
        }
        drop(grids);

        tracing::debug!(
            agent = %agent,
            waypoints = released_waypoints,
            grids = agent_grids.len(),
            "Agent removed from track traffic"
        );
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.waypoint_overlap.clear();
        self.overlapping_agents.clear();
        self.agent_to_grids.clear();
        self.grid_to_agents.clear();
        tracing::debug!("Track traffic cleared");
    }

    /// Entry counts per map.
    #[must_use]
    pub fn snapshot_stats(&self) -> TrackTrafficStats {
        TrackTrafficStats {
            waypoints: self.waypoint_overlap.len(),
            linked_agents: self.overlapping_agents.len(),
            agents_in_grids: self.agent_to_grids.len(),
            occupied_grids: self.grid_to_agents.len(),
        }
    }

    /// Ordered copy of both grid maps.
    ///
    /// Shards are read one at a time; take the snapshot while writers are
    /// quiet if an exact cut is needed.
    #[must_use]
    pub fn grid_index(&self) -> GridIndexSnapshot {
        let agent_to_grids = collect_ordered(&self.agent_to_grids);
        let grid_to_agents = collect_ordered(&self.grid_to_agents);
        GridIndexSnapshot {
            agent_to_grids,
            grid_to_agents,
        }
    }

    fn adjust_link(&self, a: AgentId, b: AgentId, change: LinkChange) {
        let index_a = self.overlapping_agents.shard_index(&a);
        let index_b = self.overlapping_agents.shard_index(&b);

        if index_a == index_b {
            let mut shard = self.overlapping_agents.shard_at(index_a).write();
            change.apply(&mut shard, a, b);
            change.apply(&mut shard, b, a);
            return;
        }

        let (low, high) = if index_a < index_b {
            (index_a, index_b)
        } else {
            (index_b, index_a)
        };
        let mut low_shard = self.overlapping_agents.shard_at(low).write();
        let mut high_shard = self.overlapping_agents.shard_at(high).write();
        let (shard_a, shard_b) = if index_a == low {
            (&mut *low_shard, &mut *high_shard)
        } else {
            (&mut *high_shard, &mut *low_shard)
        };
        change.apply(shard_a, a, b);
        change.apply(shard_b, b, a);
    }
}

impl Default for TrackTraffic {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TrackTraffic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackTraffic")
            .field("shard_count", &self.shard_count())
            .field("stats", &self.snapshot_stats())
            .finish()
    }
}

#[derive(Debug, Clone, Copy)]
enum LinkChange {
    Add,
    Release,
}

impl LinkChange {
    fn apply(self, links: &mut AHashMap<AgentId, LinkCounts>, from: AgentId, to: AgentId) {
        match self {
            LinkChange::Add => {
                *links.entry(from).or_default().entry(to).or_insert(0) += 1;
            }
            LinkChange::Release => {
                let Some(peers) = links.get_mut(&from) else {
                    return;
                };
                if let Some(count) = peers.get_mut(&to) {
                    *count = count.saturating_sub(1);
                    if *count == 0 {
                        peers.remove(&to);
                    }
                }
                if peers.is_empty() {
                    links.remove(&from);
                }
            }
        }
    }
}

fn collect_ordered<K, V>(map: &ShardedMap<K, AHashSet<V>>) -> BTreeMap<K, BTreeSet<V>>
where
    K: std::hash::Hash + Eq + Ord + Copy,
    V: Ord + Copy,
{
    let mut ordered = BTreeMap::new();
    for shard in map.shards() {
        for (key, values) in shard.read().iter() {
            ordered.insert(*key, values.iter().copied().collect());
        }
    }
    ordered
}
