//! Prelude for trafficmanager-pipeline.
//!
//! ```rust
//! use trafficmanager_pipeline::prelude::*;
//!
//! let config = TrafficManagerConfig::default();
//! assert!(config.validate().is_ok());
//! ```

pub use crate::config::{PipelineConfig, PipelineConfigBuilder, TrafficManagerConfig};
pub use crate::error::{PipelineError, PipelineResult};
pub use crate::report::{LinkReport, SessionReport, StageReport};
pub use crate::session::Session;
pub use crate::stage::Stage;

pub use trafficmanager_messenger::{ChannelError, Messenger};
pub use trafficmanager_track::TrackTraffic;
