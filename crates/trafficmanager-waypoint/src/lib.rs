//! # trafficmanager-waypoint
//!
//! Identity and geometry leaves of the traffic manager core.
//!
//! - [`key`]: [`WaypointKey`], a stable 64-bit identity for a patch of lane,
//!   derived from `(road, section, lane)` and the longitudinal offset quantized
//!   to 0.5 cm buckets.
//! - [`deviation`]: signed lateral deviation and alignment between an agent's
//!   heading and the direction to a target point.
//! - [`types`]: the opaque ids supplied by the actor layer and the road network.
//!
//! Everything here is a pure function of its inputs. Keys are identical across
//! processes and platforms, so they can be persisted as plain `u64`.
//!
//! ## Example
//!
//! ```rust
//! use trafficmanager_waypoint::prelude::*;
//!
//! let a = RoadPosition::new(5, 2, -1, 12.345).key();
//! let b = compute_key(5, 2, -1, 12.3451);
//! assert_eq!(a, b);
//!
//! let agent = AgentState::new(Point3::origin(), Vector3::x(), 2.0);
//! let left = Point3::new(0.0, 10.0, 0.0);
//! assert!(cross_deviation(&agent, &left) > 0.0);
//! ```

#![deny(
    unsafe_op_in_unsafe_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    missing_debug_implementations
)]
#![warn(clippy::pedantic)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod deviation;
pub mod key;
pub mod types;

pub mod prelude;

pub use deviation::{AgentPose, AgentState, cross_deviation, dot_deviation};
pub use key::{S_BUCKETS_PER_METRE, WaypointKey, compute_key, quantize_s};
pub use types::{AgentId, GridCell, GridId, RoadPosition, Waypoint};

pub use nalgebra::{Point3, Vector3};
