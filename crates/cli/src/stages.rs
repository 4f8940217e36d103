//! The three simulated pipeline stages and the packets they exchange.
//!
//! ```text
//! driver --Observation--> localization --Localized--> collision
//!        <----Command---- planning <------Assessed-----'
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use serde::Serialize;
use trafficmanager_pipeline::{Stage, TrackTraffic};
use trafficmanager_waypoint::prelude::*;

use crate::world::Ring;

/// Waypoints each agent keeps registered ahead of itself.
pub const HORIZON_WAYPOINTS: u64 = 8;
/// Waypoints between the vehicle and its steering target.
pub const LOOKAHEAD_WAYPOINTS: u64 = 3;
/// A leader closer than this is a hazard.
pub const SAFE_GAP_M: f32 = 12.0;

/// Where the driver says an agent is.
#[derive(Debug, Clone, Copy)]
pub struct Observation {
    /// Agent.
    pub agent: AgentId,
    /// Lane index.
    pub lane: u8,
    /// Distance driven since spawn.
    pub odometer_m: f64,
    /// Current speed.
    pub speed_mps: f64,
}

/// Observation plus pose and steering target.
#[derive(Debug, Clone, Copy)]
pub struct Localized {
    /// Source observation.
    pub observation: Observation,
    /// Vehicle pose.
    pub pose: AgentState,
    /// Lane centre a few waypoints ahead.
    pub lookahead: Point3<f32>,
}

/// A vehicle ahead in the same lane, too close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hazard {
    /// The leader.
    pub other: AgentId,
    /// Distance between vehicle centres.
    pub gap_m: f32,
}

/// Localized packet plus collision verdict.
#[derive(Debug, Clone, Copy)]
pub struct Assessed {
    /// Localization output.
    pub localized: Localized,
    /// Closest hazard, if any.
    pub hazard: Option<Hazard>,
}

/// Control output for one agent and one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Command {
    /// Agent.
    pub agent: AgentId,
    /// Throttle in `[0, 1]`.
    pub throttle: f32,
    /// Brake in `[0, 1]`.
    pub brake: f32,
    /// Steering in `[-1, 1]`, positive to the left.
    pub steer: f32,
    /// Hazard that caused braking.
    pub hazard: Option<Hazard>,
}

/// Keeps each agent's waypoint buffer registered in the track traffic.
pub struct Localization {
    ring: Ring,
    track: Arc<TrackTraffic>,
    buffers: HashMap<AgentId, VecDeque<(u64, Waypoint)>>,
}

impl Localization {
    /// Create the stage.
    pub fn new(ring: Ring, track: Arc<TrackTraffic>) -> Self {
        Self {
            ring,
            track,
            buffers: HashMap::new(),
        }
    }
}

impl Stage for Localization {
    type Input = Observation;
    type Output = Localized;

    fn name(&self) -> &str {
        "localization"
    }

    fn process(&mut self, observation: Observation) -> Option<Localized> {
        let agent = observation.agent;
        let current = Ring::index_at(observation.odometer_m);
        let buffer = self.buffers.entry(agent).or_default();

        while let Some(&(index, passed)) = buffer.front() {
            if index >= current {
                break;
            }
            buffer.pop_front();
            self.track.remove_passage(passed.key(), agent);
            let remaining = buffer.front().map(|(_, next)| next as &dyn GridCell);
            self.track.remove_grid_position(agent, &passed, remaining);
        }

        let mut next = buffer.back().map_or(current, |&(index, _)| index + 1);
        while next <= current + HORIZON_WAYPOINTS {
            let waypoint = self.ring.waypoint(observation.lane, next);
            self.track.record_passage(waypoint.key(), agent);
            self.track.update_grid_position(agent, &waypoint);
            buffer.push_back((next, waypoint));
            next += 1;
        }

        Some(Localized {
            observation,
            pose: self.ring.pose(observation.lane, observation.odometer_m),
            lookahead: self
                .ring
                .waypoint(observation.lane, current + LOOKAHEAD_WAYPOINTS)
                .location,
        })
    }
}

/// Finds the closest leader among agents sharing the ego agent's path.
pub struct Collision {
    track: Arc<TrackTraffic>,
    poses: HashMap<AgentId, AgentState>,
}

impl Collision {
    /// Create the stage.
    pub fn new(track: Arc<TrackTraffic>) -> Self {
        Self {
            track,
            poses: HashMap::new(),
        }
    }
}

impl Stage for Collision {
    type Input = Localized;
    type Output = Assessed;

    fn name(&self) -> &str {
        "collision"
    }

    fn process(&mut self, localized: Localized) -> Option<Assessed> {
        let ego = localized.observation.agent;
        self.poses.insert(ego, localized.pose);

        // Grid neighbours are the cheap prefilter; shared waypoints mean the
        // same lane.
        let nearby = self.track.overlapping_agents(ego);
        let same_path = self.track.waypoint_overlaps(ego);

        let hazard = nearby
            .intersection(&same_path)
            .filter_map(|other| {
                let pose = self.poses.get(other)?;
                let ahead = dot_deviation(&localized.pose, &pose.location, true) > 0.0;
                let gap_m = (pose.location - localized.pose.location).norm();
                (ahead && gap_m < SAFE_GAP_M).then_some(Hazard {
                    other: *other,
                    gap_m,
                })
            })
            .min_by(|a, b| a.gap_m.total_cmp(&b.gap_m));

        if let Some(hazard) = hazard {
            tracing::trace!(agent = %ego, other = %hazard.other, gap_m = hazard.gap_m, "Hazard");
        }
        Some(Assessed { localized, hazard })
    }
}

/// Turns a verdict into throttle, brake and steering.
pub struct Planning {
    target_speeds: HashMap<AgentId, f64>,
}

impl Planning {
    /// Create the stage with a target speed per agent.
    pub fn new(target_speeds: HashMap<AgentId, f64>) -> Self {
        Self { target_speeds }
    }
}

impl Stage for Planning {
    type Input = Assessed;
    type Output = Command;

    fn name(&self) -> &str {
        "planning"
    }

    fn process(&mut self, assessed: Assessed) -> Option<Command> {
        let Localized {
            observation,
            pose,
            lookahead,
        } = assessed.localized;
        let target = self
            .target_speeds
            .get(&observation.agent)
            .copied()
            .unwrap_or(0.0);

        let steer = (cross_deviation(&pose, &lookahead) * 2.0).clamp(-1.0, 1.0);
        let (throttle, brake) = match assessed.hazard {
            Some(hazard) => (0.0, (1.0 - hazard.gap_m / SAFE_GAP_M).clamp(0.2, 1.0)),
            None if observation.speed_mps < target => (1.0, 0.0),
            None => (0.0, 0.0),
        };

        Some(Command {
            agent: observation.agent,
            throttle,
            brake,
            steer,
            hazard: assessed.hazard,
        })
    }
}
