//! # trafficmanager-track
//!
//! Shared occupancy registry of the traffic manager pipeline.
//!
//! [`TrackTraffic`] records which agents pass through each waypoint and which
//! agents sit in each coarse grid cell, so a stage can ask "who else is here?"
//! in near constant time instead of scanning every pair of agents.
//!
//! Four maps are kept:
//!
//! | map | key | value |
//! |---|---|---|
//! | waypoint overlap | [`WaypointKey`] | agents passing through it |
//! | overlapping agents | [`AgentId`] | agents sharing a waypoint, with a shared-waypoint count |
//! | agent to grids | [`AgentId`] | grid cells the agent occupies |
//! | grid to agents | [`GridId`] | exact inverse of the above |
//!
//! Every map is split into independently locked shards. Unknown ids read as
//! empty and removing something never added is a no-op, so no operation
//! returns an error.
//!
//! ## Example
//!
//! ```rust
//! use trafficmanager_track::prelude::*;
//! use trafficmanager_waypoint::prelude::*;
//!
//! let track = TrackTraffic::new();
//! let key = compute_key(5, 2, -1, 12.345);
//! track.record_passage(key, AgentId(1));
//! track.record_passage(key, AgentId(2));
//! assert!(track.waypoint_overlaps(AgentId(1)).contains(&AgentId(2)));
//!
//! track.update_grid_position(AgentId(1), &GridId(10));
//! track.update_grid_position(AgentId(2), &GridId(10));
//! assert!(track.overlapping_agents(AgentId(1)).contains(&AgentId(2)));
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

pub mod config;
pub mod stats;
pub mod track;

mod sharded;

pub mod prelude;

pub use config::{MAX_SHARDS, MIN_SHARDS, TrackTrafficConfig, TrackTrafficConfigBuilder};
pub use stats::{GridIndexSnapshot, TrackTrafficStats};
pub use track::TrackTraffic;

pub use trafficmanager_waypoint::{AgentId, GridCell, GridId, WaypointKey};
