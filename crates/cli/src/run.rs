//! Drives synthetic agents around the ring through the stage pipeline.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use trafficmanager_pipeline::prelude::*;
use trafficmanager_track::TrackTrafficStats;
use trafficmanager_waypoint::prelude::*;

use crate::error::CliError;
use crate::stages::{Collision, Command, Localization, Observation, Planning};
use crate::world::Ring;

/// Simulation step.
pub const TICK_S: f64 = 0.05;
const ACCEL_MPS2: f64 = 3.0;
const BRAKE_MPS2: f64 = 8.0;

/// Simulation parameters.
#[derive(Debug, Clone, Serialize)]
pub struct SimParams {
    /// Number of agents.
    pub agents: u32,
    /// Number of ticks to run.
    pub ticks: u32,
    /// Lanes on the ring.
    pub lanes: u8,
    /// Ring length in metres.
    pub ring_length_m: f64,
    /// Random seed for spawn positions and target speeds.
    pub seed: u64,
}

/// Outcome of a run.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    /// Parameters the run used.
    pub params: SimParams,
    /// Wall-clock duration.
    pub elapsed_ms: u128,
    /// Commands issued.
    pub commands: u64,
    /// Commands that braked for a hazard.
    pub hazard_commands: u64,
    /// Smallest hazard gap seen.
    pub min_gap_m: Option<f32>,
    /// Mean speed over all agents at the end.
    pub mean_speed_mps: f64,
    /// Registry counts before the agents were destroyed.
    pub track: TrackTrafficStats,
    /// Registry counts after the agents were destroyed.
    pub track_after_teardown: TrackTrafficStats,
    /// Stage and link counters.
    pub session: SessionReport,
}

#[derive(Debug, Clone, Copy)]
struct SimAgent {
    id: AgentId,
    lane: u8,
    odometer_m: f64,
    speed_mps: f64,
}

impl SimAgent {
    fn observe(&self) -> Observation {
        Observation {
            agent: self.id,
            lane: self.lane,
            odometer_m: self.odometer_m,
            speed_mps: self.speed_mps,
        }
    }

    fn apply(&mut self, command: &Command, max_speed: f64) {
        let accel = f64::from(command.throttle) * ACCEL_MPS2 - f64::from(command.brake) * BRAKE_MPS2;
        self.speed_mps = (self.speed_mps + accel * TICK_S).clamp(0.0, max_speed);
        self.odometer_m += self.speed_mps * TICK_S;
    }
}

fn spawn_agents(params: &SimParams, ring: &Ring) -> (Vec<SimAgent>, HashMap<AgentId, f64>) {
    let mut rng = StdRng::seed_from_u64(params.seed);
    let spacing = ring.length_m() / f64::from(params.agents.max(1));
    let mut agents = Vec::new();
    let mut targets = HashMap::new();
    for i in 0..params.agents {
        let id = AgentId(i);
        agents.push(SimAgent {
            id,
            lane: rng.random_range(0..ring.lanes()),
            odometer_m: f64::from(i) * spacing + rng.random_range(0.0..spacing * 0.25),
            speed_mps: 0.0,
        });
        targets.insert(id, rng.random_range(8.0..16.0));
    }
    (agents, targets)
}

/// Run the simulation to completion.
///
/// # Errors
///
/// Returns an error if a stage cannot be spawned or the command link stops
/// before every command of a tick arrived.
pub fn run(params: SimParams, config: &TrafficManagerConfig) -> Result<SimReport, CliError> {
    if params.agents == 0 {
        return Err(CliError::InvalidArgument("--agents must be at least 1".into()));
    }

    let started = Instant::now();
    let ring = Ring::new(params.ring_length_m, params.lanes);
    let (mut agents, targets) = spawn_agents(&params, &ring);
    let max_speed = targets.values().copied().fold(0.0, f64::max) * 1.2;

    let mut session = Session::new(config)?;
    let track = Arc::clone(session.track());
    let observations = session.link::<Observation>("driver->localization");
    let localized = session.link("localization->collision");
    let assessed = session.link("collision->planning");
    let commands = session.link::<Command>("planning->driver");

    session.spawn_stage(
        Localization::new(ring, Arc::clone(&track)),
        Arc::clone(&observations),
        Some(Arc::clone(&localized)),
    )?;
    session.spawn_stage(
        Collision::new(Arc::clone(&track)),
        localized,
        Some(Arc::clone(&assessed)),
    )?;
    session.spawn_stage(Planning::new(targets), assessed, Some(Arc::clone(&commands)))?;

    tracing::info!(
        agents = params.agents,
        ticks = params.ticks,
        lanes = ring.lanes(),
        "Simulation started"
    );

    let mut issued = 0_u64;
    let mut hazard_commands = 0_u64;
    let mut min_gap_m: Option<f32> = None;

    for tick in 0..params.ticks {
        for agent in &agents {
            observations
                .send(agent.observe())
                .map_err(|_| CliError::LinkStopped("driver->localization".into()))?;
        }

        for _ in 0..agents.len() {
            let command = commands
                .receive()
                .map_err(|_| CliError::LinkStopped("planning->driver".into()))?;
            issued += 1;
            if let Some(hazard) = command.hazard {
                hazard_commands += 1;
                min_gap_m = Some(min_gap_m.map_or(hazard.gap_m, |gap| gap.min(hazard.gap_m)));
            }
            let index = usize::try_from(command.agent.0).unwrap_or(usize::MAX);
            if let Some(agent) = agents.get_mut(index) {
                agent.apply(&command, max_speed);
            }
        }

        if tick % 20 == 0 {
            tracing::debug!(tick, stats = ?track.snapshot_stats(), "Tick");
        }
    }

    let track_stats = track.snapshot_stats();
    for agent in &agents {
        track.remove_agent(agent.id);
    }
    let track_after_teardown = track.snapshot_stats();
    let session_report = session.shutdown();

    #[allow(clippy::cast_precision_loss)]
    let mean_speed_mps =
        agents.iter().map(|a| a.speed_mps).sum::<f64>() / agents.len() as f64;

    tracing::info!(
        commands = issued,
        hazards = hazard_commands,
        "Simulation finished"
    );

    Ok(SimReport {
        params,
        elapsed_ms: started.elapsed().as_millis(),
        commands: issued,
        hazard_commands,
        min_gap_m,
        mean_speed_mps,
        track: track_stats,
        track_after_teardown,
        session: session_report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    fn params(agents: u32, ticks: u32) -> SimParams {
        SimParams {
            agents,
            ticks,
            lanes: 2,
            ring_length_m: 200.0,
            seed: 7,
        }
    }

    #[test]
    fn test_run_issues_one_command_per_agent_per_tick() -> TestResult {
        let report = run(params(6, 30), &TrafficManagerConfig::default())?;
        assert_eq!(report.commands, 180);
        assert!(report.track_after_teardown.is_empty());
        assert!(!report.session.any_panicked());
        assert_eq!(report.session.stages.len(), 3);
        assert!(report.mean_speed_mps > 0.0);
        Ok(())
    }

    #[test]
    fn test_crowded_ring_produces_hazards() -> TestResult {
        let mut crowded = params(40, 60);
        crowded.lanes = 1;
        crowded.ring_length_m = 120.0;
        let report = run(crowded, &TrafficManagerConfig::default())?;
        assert!(report.hazard_commands > 0);
        assert!(report.min_gap_m.is_some_and(|gap| gap < crate::stages::SAFE_GAP_M));
        Ok(())
    }

    #[test]
    fn test_zero_agents_rejected() {
        let result = run(params(0, 1), &TrafficManagerConfig::default());
        assert!(matches!(result, Err(CliError::InvalidArgument(_))));
    }
}
