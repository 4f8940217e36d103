//! Agent lifecycle through the registry: spawn, advance along a path, share a
//! waypoint and a grid cell with another agent, leave, get destroyed.

use trafficmanager_track::prelude::*;
use trafficmanager_waypoint::prelude::*;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn waypoint(s: f64, grid: i64) -> Waypoint {
    Waypoint::new(
        RoadPosition::new(5, 2, -1, s),
        Point3::new(s as f32, -1.75, 0.0),
        GridId(grid),
    )
}

#[test]
fn test_two_agents_share_waypoint_and_grid() {
    let track = TrackTraffic::new();
    let a = AgentId(1);
    let b = AgentId(2);
    let shared = waypoint(12.345, 10);
    let key = compute_key(5, 2, -1, 12.345);
    assert_eq!(shared.key(), key);

    track.record_passage(key, a);
    track.record_passage(key, b);
    track.update_grid_position(a, &shared);
    track.update_grid_position(b, &shared);

    let passing = track.passing_agents(key);
    assert!(passing.contains(&a) && passing.contains(&b));
    assert!(track.waypoint_overlaps(a).contains(&b));
    assert!(track.waypoint_overlaps(b).contains(&a));
    assert!(track.overlapping_agents(a).contains(&b));

    track.remove_grid_position(a, &shared, None);
    assert!(!track.overlapping_agents(a).contains(&b));
    assert!(!track.overlapping_agents(b).contains(&a));
    assert!(track.grid_index().is_consistent());
}

#[test]
fn test_sole_occupant_removal_prunes_entry() {
    let track = TrackTraffic::new();
    let key = compute_key(5, 2, -1, 12.345);
    track.record_passage(key, AgentId(1));
    assert_eq!(track.snapshot_stats().waypoints, 1);

    track.remove_passage(key, AgentId(1));
    assert!(track.passing_agents(key).is_empty());
    assert_eq!(track.snapshot_stats().waypoints, 0);
}

#[test]
fn test_nearby_s_maps_to_same_waypoint_entry() {
    let track = TrackTraffic::new();
    track.record_passage(compute_key(5, 2, -1, 12.345), AgentId(1));
    track.record_passage(compute_key(5, 2, -1, 12.3451), AgentId(2));
    track.record_passage(compute_key(5, 2, -1, 12.35), AgentId(3));

    let passing = track.passing_agents(compute_key(5, 2, -1, 12.345));
    assert_eq!(passing.len(), 2);
    assert!(!passing.contains(&AgentId(3)));
}

#[test]
fn test_path_advance_across_grid_boundary() {
    let track = TrackTraffic::new();
    let agent = AgentId(7);
    let path: Vec<Waypoint> = (0..6)
        .map(|i| waypoint(f64::from(i) * 2.0, i64::from(i / 3)))
        .collect();

    for wp in &path {
        track.record_passage(wp.key(), agent);
        track.update_grid_position(agent, wp);
    }
    assert_eq!(track.grids_of(agent).len(), 2);

    // Drop the tail of the buffer; the agent leaves grid 0 only when the
    // front waypoint is in grid 1.
    for (i, wp) in path.iter().enumerate() {
        let remaining = path.get(i + 1);
        track.remove_passage(wp.key(), agent);
        track.remove_grid_position(agent, wp, remaining.map(|r| r as &dyn GridCell));
        if i < 2 {
            assert!(track.grids_of(agent).contains(&GridId(0)));
        }
        if i == 2 {
            assert!(!track.grids_of(agent).contains(&GridId(0)));
        }
    }

    assert!(track.grids_of(agent).is_empty());
    assert!(track.snapshot_stats().is_empty());
}

#[test]
fn test_destroyed_agent_removed_everywhere() -> TestResult {
    let config = TrackTrafficConfig::builder().shard_count(8).build()?;
    let track = TrackTraffic::with_config(&config);
    assert_eq!(track.shard_count(), 8);

    let victim = AgentId(1);
    let survivor = AgentId(2);
    for i in 0..10 {
        let wp = waypoint(f64::from(i), 3);
        track.record_passage(wp.key(), victim);
        track.record_passage(wp.key(), survivor);
        track.update_grid_position(victim, &wp);
        track.update_grid_position(survivor, &wp);
    }

    track.remove_agent(victim);

    assert!(track.waypoint_overlaps(survivor).is_empty());
    assert!(track.overlapping_agents(survivor).is_empty());
    assert_eq!(track.agents_in_grid(GridId(3)).len(), 1);
    let stats = track.snapshot_stats();
    assert_eq!(stats.waypoints, 10);
    assert_eq!(stats.linked_agents, 0);
    assert_eq!(stats.agents_in_grids, 1);
    assert_eq!(stats.occupied_grids, 1);
    Ok(())
}

#[test]
fn test_config_and_stats_serialize() -> TestResult {
    let config: TrackTrafficConfig = serde_json::from_str(r#"{"shard_count": 16}"#)?;
    assert_eq!(config.shard_count, 16);
    let defaulted: TrackTrafficConfig = serde_json::from_str("{}")?;
    assert_eq!(defaulted, TrackTrafficConfig::default());

    let track = TrackTraffic::new();
    track.update_grid_position(AgentId(4), &GridId(-2));
    let json = serde_json::to_value(track.grid_index())?;
    assert_eq!(json["agent_to_grids"]["4"], serde_json::json!([-2]));
    Ok(())
}
