//! Identifiers and road positions supplied by external collaborators.
//!
//! The core never allocates or validates agent ids and never derives grid
//! cells itself; it only stores and indexes what it is handed.

use core::fmt;

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::key::{WaypointKey, compute_key};

/// Opaque agent identity assigned by the actor management layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub u32);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent#{}", self.0)
    }
}

impl From<u32> for AgentId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

/// Coarse geographic cell of the road network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GridId(pub i64);

impl fmt::Display for GridId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "grid#{}", self.0)
    }
}

impl From<i64> for GridId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

/// Anything the road network can place in a grid cell.
pub trait GridCell {
    /// The grid cell this position falls in.
    fn grid_id(&self) -> GridId;
}

impl GridCell for GridId {
    fn grid_id(&self) -> GridId {
        *self
    }
}

/// Lane-relative position: `(road, section, lane)` plus arc length `s` in metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoadPosition {
    /// Road identifier.
    pub road_id: u32,
    /// Lane section within the road.
    pub section_id: u32,
    /// Signed lane id; the sign encodes the side of the reference line.
    pub lane_id: i32,
    /// Arc length along the lane.
    pub s: f64,
}

impl RoadPosition {
    /// Create a road position.
    #[must_use]
    pub const fn new(road_id: u32, section_id: u32, lane_id: i32, s: f64) -> Self {
        Self {
            road_id,
            section_id,
            lane_id,
            s,
        }
    }

    /// Identity key of this position.
    #[must_use]
    pub fn key(&self) -> WaypointKey {
        compute_key(self.road_id, self.section_id, self.lane_id, self.s)
    }
}

/// A waypoint as handed over by the road network: where it is on the lane,
/// where it is in the world and which grid cell it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Lane-relative position.
    pub position: RoadPosition,
    /// World location.
    pub location: Point3<f32>,
    /// Grid cell assigned by the road network.
    pub grid: GridId,
}

impl Waypoint {
    /// Create a waypoint.
    #[must_use]
    pub const fn new(position: RoadPosition, location: Point3<f32>, grid: GridId) -> Self {
        Self {
            position,
            location,
            grid,
        }
    }

    /// Identity key of this waypoint.
    #[must_use]
    pub fn key(&self) -> WaypointKey {
        self.position.key()
    }
}

impl GridCell for Waypoint {
    fn grid_id(&self) -> GridId {
        self.grid
    }
}
