//! # trafficmanager-pipeline
//!
//! Runs the traffic manager as a chain of stage threads.
//!
//! Each [`Stage`] gets its own OS thread for the lifetime of a [`Session`]. It
//! blocks on its inbound [`Messenger`], processes one packet, and forwards the
//! result on its outbound link. The only state shared by all stages is the
//! session's [`TrackTraffic`] registry.
//!
//! ## Lifecycle
//!
//! - [`Session::pause`] stops every link. Stages see `ChannelError::Stopped`,
//!   back off for `stage_backoff_ms` and re-check; nothing is lost.
//! - [`Session::resume`] restarts every link.
//! - [`Session::shutdown`] raises the shutdown flag, stops every link so no
//!   stage stays blocked, joins the threads and returns a [`SessionReport`].
//!   Dropping a session does the same.
//!
//! ## Example
//!
//! ```rust
//! use trafficmanager_pipeline::prelude::*;
//!
//! struct Double;
//!
//! impl Stage for Double {
//!     type Input = u32;
//!     type Output = u32;
//!     fn name(&self) -> &str { "double" }
//!     fn process(&mut self, input: u32) -> Option<u32> { Some(input * 2) }
//! }
//!
//! # fn main() -> Result<(), PipelineError> {
//! let mut session = Session::new(&TrafficManagerConfig::default())?;
//! let inbound = session.link::<u32>("source->double");
//! let outbound = session.link::<u32>("double->sink");
//! session.spawn_stage(Double, inbound.clone(), Some(outbound.clone()))?;
//!
//! inbound.send(21).ok();
//! assert_eq!(outbound.receive(), Ok(42));
//!
//! let report = session.shutdown();
//! assert_eq!(report.stage("double").map(|s| s.forwarded), Some(1));
//! # Ok(())
//! # }
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
pub mod error;
pub mod report;
pub mod session;
pub mod stage;

pub mod prelude;

pub use config::{PipelineConfig, PipelineConfigBuilder, TrafficManagerConfig};
pub use error::{PipelineError, PipelineResult};
pub use report::{LinkReport, SessionReport, StageReport};
pub use session::Session;
pub use stage::Stage;

pub use trafficmanager_messenger::{ChannelError, Messenger};
pub use trafficmanager_track::TrackTraffic;
