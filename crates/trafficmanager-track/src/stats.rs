//! Registry observability.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use trafficmanager_waypoint::{AgentId, GridId};

/// Entry counts per registry map.
///
/// Counts are gathered shard by shard, so under concurrent writes they are an
/// approximation rather than a single consistent cut.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackTrafficStats {
    /// Waypoints with at least one occupant.
    pub waypoints: usize,
    /// Agents with at least one overlap link.
    pub linked_agents: usize,
    /// Agents occupying at least one grid cell.
    pub agents_in_grids: usize,
    /// Grid cells with at least one occupant.
    pub occupied_grids: usize,
}

impl TrackTrafficStats {
    /// True when every map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Ordered copy of both grid maps, for diagnostics and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridIndexSnapshot {
    /// Agent to the grid cells it occupies.
    pub agent_to_grids: BTreeMap<AgentId, BTreeSet<GridId>>,
    /// Grid cell to its occupants.
    pub grid_to_agents: BTreeMap<GridId, BTreeSet<AgentId>>,
}

impl GridIndexSnapshot {
    /// True when the two maps are exact inverses and hold no empty sets.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let forward_ok = self.agent_to_grids.iter().all(|(agent, grids)| {
            !grids.is_empty()
                && grids.iter().all(|grid| {
                    self.grid_to_agents
                        .get(grid)
                        .is_some_and(|agents| agents.contains(agent))
                })
        });
        let inverse_ok = self.grid_to_agents.iter().all(|(grid, agents)| {
            !agents.is_empty()
                && agents.iter().all(|agent| {
                    self.agent_to_grids
                        .get(agent)
                        .is_some_and(|grids| grids.contains(grid))
                })
        });
        forward_ok && inverse_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_snapshot_is_consistent() {
        assert!(GridIndexSnapshot::default().is_consistent());
        assert!(TrackTrafficStats::default().is_empty());
    }

    #[test]
    fn test_orphan_detected() {
        let mut snapshot = GridIndexSnapshot::default();
        snapshot
            .agent_to_grids
            .entry(AgentId(1))
            .or_default()
            .insert(GridId(7));
        assert!(!snapshot.is_consistent());

        snapshot
            .grid_to_agents
            .entry(GridId(7))
            .or_default()
            .insert(AgentId(1));
        assert!(snapshot.is_consistent());

        snapshot.grid_to_agents.entry(GridId(8)).or_default();
        assert!(!snapshot.is_consistent());
    }
}
