//! Centralized error types for the traffic manager core.
//!
//! The coordination primitives themselves have almost no failure modes: an
//! unknown agent or waypoint is an empty result, and a stopped channel is a
//! sentinel the caller backs off from. What remains lives here so every crate
//! in the workspace reports it the same way.
//!
//! # Architecture
//!
//! - [`common`]: top-level [`TrafficManagerError`] plus category and severity
//! - [`channel`]: [`ChannelError`], the "channel unavailable" sentinel
//! - [`validation`]: configuration validation failures
//!
//! # Example
//!
//! ```
//! use trafficmanager_errors::prelude::*;
//!
//! fn check_shards(count: usize) -> Result<usize> {
//!     if !count.is_power_of_two() {
//!         return Err(ValidationError::constraint("shard_count must be a power of two").into());
//!     }
//!     Ok(count)
//! }
//!
//! assert!(check_shards(64).is_ok());
//! assert!(check_shards(3).is_err());
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod channel;
pub mod common;
pub mod prelude;
pub mod validation;

pub use channel::ChannelError;
pub use common::{ErrorCategory, ErrorSeverity, ResultExt, TrafficManagerError};
pub use validation::ValidationError;

/// A specialized `Result` type for traffic manager operations.
pub type Result<T> = std::result::Result<T, TrafficManagerError>;

/// A specialized `Result` type for channel operations.
pub type ChannelResult<T> = std::result::Result<T, ChannelError>;
