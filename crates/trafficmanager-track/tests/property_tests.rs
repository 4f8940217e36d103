//! Property-based tests: for any sequence of registry operations the grid maps
//! stay exact inverses, and overlap links equal "shares at least one waypoint".

use std::collections::{BTreeMap, BTreeSet, HashSet};

use proptest::prelude::*;
use trafficmanager_track::prelude::*;
use trafficmanager_waypoint::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Record(u8, u32),
    RemovePassage(u8, u32),
    UpdateGrid(u32, i64),
    RemoveGrid(u32, i64, Option<i64>),
    RemoveAgent(u32),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let agent = 0_u32..6;
    let waypoint = 0_u8..8;
    let grid = 0_i64..5;
    prop_oneof![
        4 => (waypoint.clone(), agent.clone()).prop_map(|(w, a)| Op::Record(w, a)),
        2 => (waypoint, agent.clone()).prop_map(|(w, a)| Op::RemovePassage(w, a)),
        4 => (agent.clone(), grid.clone()).prop_map(|(a, g)| Op::UpdateGrid(a, g)),
        2 => (agent.clone(), grid.clone(), proptest::option::of(grid))
            .prop_map(|(a, g, r)| Op::RemoveGrid(a, g, r)),
        1 => agent.prop_map(Op::RemoveAgent),
    ]
}

fn key(index: u8) -> WaypointKey {
    compute_key(3, 1, -2, f64::from(index) * 0.75)
}

#[derive(Default)]
struct Model {
    waypoints: BTreeMap<u8, BTreeSet<u32>>,
    agent_to_grids: BTreeMap<AgentId, BTreeSet<GridId>>,
    grid_to_agents: BTreeMap<GridId, BTreeSet<AgentId>>,
}

impl Model {
    fn remove_from_grid(&mut self, agent: AgentId, grid: GridId) {
        if let Some(grids) = self.agent_to_grids.get_mut(&agent) {
            grids.remove(&grid);
            if grids.is_empty() {
                self.agent_to_grids.remove(&agent);
            }
        }
        if let Some(agents) = self.grid_to_agents.get_mut(&grid) {
            agents.remove(&agent);
            if agents.is_empty() {
                self.grid_to_agents.remove(&grid);
            }
        }
    }

    fn apply(&mut self, op: &Op) {
        match *op {
            Op::Record(w, a) => {
                self.waypoints.entry(w).or_default().insert(a);
            }
            Op::RemovePassage(w, a) => {
                if let Some(set) = self.waypoints.get_mut(&w) {
                    set.remove(&a);
                    if set.is_empty() {
                        self.waypoints.remove(&w);
                    }
                }
            }
            Op::UpdateGrid(a, g) => {
                self.agent_to_grids
                    .entry(AgentId(a))
                    .or_default()
                    .insert(GridId(g));
                self.grid_to_agents
                    .entry(GridId(g))
                    .or_default()
                    .insert(AgentId(a));
            }
            Op::RemoveGrid(a, g, remaining) => {
                if remaining != Some(g) {
                    self.remove_from_grid(AgentId(a), GridId(g));
                }
            }
            Op::RemoveAgent(a) => {
                for set in self.waypoints.values_mut() {
                    set.remove(&a);
                }
                self.waypoints.retain(|_, set| !set.is_empty());
                let grids: Vec<GridId> = self
                    .agent_to_grids
                    .get(&AgentId(a))
                    .map(|g| g.iter().copied().collect())
                    .unwrap_or_default();
                for grid in grids {
                    self.remove_from_grid(AgentId(a), grid);
                }
            }
        }
    }

    fn waypoint_overlaps(&self, agent: u32) -> HashSet<AgentId> {
        self.waypoints
            .values()
            .filter(|set| set.contains(&agent))
            .flat_map(|set| set.iter().copied())
            .filter(|&other| other != agent)
            .map(AgentId)
            .collect()
    }
}

fn apply(track: &TrackTraffic, op: &Op) {
    match *op {
        Op::Record(w, a) => track.record_passage(key(w), AgentId(a)),
        Op::RemovePassage(w, a) => track.remove_passage(key(w), AgentId(a)),
        Op::UpdateGrid(a, g) => track.update_grid_position(AgentId(a), &GridId(g)),
        Op::RemoveGrid(a, g, remaining) => {
            let remaining = remaining.map(GridId);
            track.remove_grid_position(
                AgentId(a),
                &GridId(g),
                remaining.as_ref().map(|r| r as &dyn GridCell),
            );
        }
        Op::RemoveAgent(a) => track.remove_agent(AgentId(a)),
    }
}

proptest! {
    #[test]
    fn prop_registry_matches_model(
        ops in prop::collection::vec(op_strategy(), 0..120),
        shard_count in prop::sample::select(vec![1_usize, 2, 8, 64]),
    ) {
        let track = TrackTraffic::with_config(&TrackTrafficConfig { shard_count });
        let mut model = Model::default();

        for op in &ops {
            apply(&track, op);
            model.apply(op);

            let index = track.grid_index();
            prop_assert!(index.is_consistent());
            prop_assert_eq!(&index.agent_to_grids, &model.agent_to_grids);
            prop_assert_eq!(&index.grid_to_agents, &model.grid_to_agents);
        }

        for agent in 0..6_u32 {
            prop_assert_eq!(track.waypoint_overlaps(AgentId(agent)), model.waypoint_overlaps(agent));
        }
        for (w, set) in &model.waypoints {
            let expected: HashSet<AgentId> = set.iter().copied().map(AgentId).collect();
            prop_assert_eq!(track.passing_agents(key(*w)), expected);
        }
        prop_assert_eq!(track.snapshot_stats().waypoints, model.waypoints.len());
    }

    #[test]
    fn prop_grid_overlap_is_symmetric(
        placements in prop::collection::vec((0_u32..10, 0_i64..4), 0..60),
    ) {
        let track = TrackTraffic::new();
        for (agent, grid) in &placements {
            track.update_grid_position(AgentId(*agent), &GridId(*grid));
        }
        for a in 0..10_u32 {
            let overlaps = track.overlapping_agents(AgentId(a));
            prop_assert!(!overlaps.contains(&AgentId(a)));
            for b in overlaps {
                prop_assert!(track.overlapping_agents(b).contains(&AgentId(a)));
            }
        }
    }

    #[test]
    fn prop_remove_agent_leaves_no_trace(
        ops in prop::collection::vec(op_strategy(), 0..80),
        victim in 0_u32..6,
    ) {
        let track = TrackTraffic::new();
        for op in &ops {
            apply(&track, op);
        }
        track.remove_agent(AgentId(victim));

        prop_assert!(track.grids_of(AgentId(victim)).is_empty());
        prop_assert!(track.waypoint_overlaps(AgentId(victim)).is_empty());
        for w in 0..8_u8 {
            prop_assert!(!track.passing_agents(key(w)).contains(&AgentId(victim)));
        }
        for other in 0..6_u32 {
            prop_assert!(!track.waypoint_overlaps(AgentId(other)).contains(&AgentId(victim)));
            prop_assert!(!track.overlapping_agents(AgentId(other)).contains(&AgentId(victim)));
        }
        prop_assert!(track.grid_index().is_consistent());
    }
}
