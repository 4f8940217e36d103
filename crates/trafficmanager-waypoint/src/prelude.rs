//! Prelude for trafficmanager-waypoint.
//!
//! ```rust
//! use trafficmanager_waypoint::prelude::*;
//!
//! let waypoint = Waypoint::new(
//!     RoadPosition::new(1, 0, 1, 4.0),
//!     Point3::new(4.0, 1.75, 0.0),
//!     GridId(0),
//! );
//! assert_eq!(waypoint.grid_id(), GridId(0));
//! ```

pub use crate::deviation::{AgentPose, AgentState, cross_deviation, dot_deviation};
pub use crate::key::{S_BUCKETS_PER_METRE, WaypointKey, compute_key, quantize_s};
pub use crate::types::{AgentId, GridCell, GridId, RoadPosition, Waypoint};

pub use nalgebra::{Point3, Vector3};
