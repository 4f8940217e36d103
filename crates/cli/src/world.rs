//! Synthetic road network: one ring road with parallel lanes.
//!
//! The ring is centred on the origin and driven counter-clockwise, so a
//! vehicle following its lane keeps the lane centre slightly to its left.

use std::f64::consts::TAU;

use trafficmanager_waypoint::prelude::*;

/// Road id of the ring.
pub const RING_ROAD_ID: u32 = 1;
/// Distance between consecutive waypoints along a lane.
pub const WAYPOINT_SPACING_M: f64 = 2.0;
/// Length of a grid cell along the ring; cells span every lane.
pub const GRID_LENGTH_M: f64 = 10.0;
/// Lateral distance between lane centres.
pub const LANE_WIDTH_M: f64 = 3.5;
/// Half of a vehicle's bounding box length.
pub const VEHICLE_HALF_LENGTH_M: f32 = 2.4;

/// A ring road with `lanes` lanes, each `length_m` long at the inner lane.
#[derive(Debug, Clone, Copy)]
pub struct Ring {
    waypoints_per_lane: u64,
    lanes: u8,
}

impl Ring {
    /// Build a ring of at least `length_m` metres, rounded to whole waypoints.
    #[must_use]
    pub fn new(length_m: f64, lanes: u8) -> Self {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let waypoints_per_lane = (length_m / WAYPOINT_SPACING_M).ceil().max(8.0) as u64;
        Self {
            waypoints_per_lane,
            lanes: lanes.max(1),
        }
    }

    /// Lane count.
    #[must_use]
    pub fn lanes(&self) -> u8 {
        self.lanes
    }

    /// Length of one lap.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn length_m(&self) -> f64 {
        self.waypoints_per_lane as f64 * WAYPOINT_SPACING_M
    }

    fn radius_m(&self) -> f64 {
        self.length_m() / TAU
    }

    /// Signed lane id of a lane index; lanes lie right of the reference line.
    #[must_use]
    pub fn lane_id(lane: u8) -> i32 {
        -(i32::from(lane) + 1)
    }

    /// Absolute waypoint index at or behind odometer reading `odometer_m`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn index_at(odometer_m: f64) -> u64 {
        (odometer_m.max(0.0) / WAYPOINT_SPACING_M).floor() as u64
    }

    /// Waypoint for an absolute (unwrapped) index on `lane`.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn waypoint(&self, lane: u8, absolute_index: u64) -> Waypoint {
        let s = (absolute_index % self.waypoints_per_lane) as f64 * WAYPOINT_SPACING_M;
        let grid = GridId((s / GRID_LENGTH_M).floor() as i64);
        Waypoint::new(
            RoadPosition::new(RING_ROAD_ID, 0, Self::lane_id(lane), s),
            self.location(lane, s),
            grid,
        )
    }

    /// World location of odometer reading `odometer_m` on `lane`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn location(&self, lane: u8, odometer_m: f64) -> Point3<f32> {
        let theta = odometer_m.rem_euclid(self.length_m()) / self.radius_m();
        let r = self.radius_m() + f64::from(lane) * LANE_WIDTH_M;
        Point3::new((r * theta.cos()) as f32, (r * theta.sin()) as f32, 0.0)
    }

    /// Lane tangent at odometer reading `odometer_m`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn heading(&self, odometer_m: f64) -> Vector3<f32> {
        let theta = odometer_m.rem_euclid(self.length_m()) / self.radius_m();
        Vector3::new(-theta.sin() as f32, theta.cos() as f32, 0.0)
    }

    /// Pose of a vehicle on `lane` at `odometer_m`.
    #[must_use]
    pub fn pose(&self, lane: u8, odometer_m: f64) -> AgentState {
        AgentState::new(
            self.location(lane, odometer_m),
            self.heading(odometer_m),
            VEHICLE_HALF_LENGTH_M,
        )
    }
}
