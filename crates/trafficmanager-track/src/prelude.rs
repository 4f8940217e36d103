//! Prelude for trafficmanager-track.
//!
//! ```rust
//! use trafficmanager_track::prelude::*;
//!
//! let config = TrackTrafficConfig::builder().shard_count(8).build();
//! assert!(config.is_ok());
//! ```

pub use crate::config::{TrackTrafficConfig, TrackTrafficConfigBuilder};
pub use crate::stats::{GridIndexSnapshot, TrackTrafficStats};
pub use crate::track::TrackTraffic;
