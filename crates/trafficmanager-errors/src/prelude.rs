//! Prelude module for convenient error handling imports.
//!
//! # Example
//!
//! ```
//! use trafficmanager_errors::prelude::*;
//!
//! fn backoff_needed(result: ChannelResult<u32>) -> bool {
//!     matches!(result, Err(e) if e.should_back_off())
//! }
//!
//! assert!(backoff_needed(Err(ChannelError::Stopped)));
//! assert!(!backoff_needed(Ok(7)));
//! ```

pub use crate::{
    ChannelResult, Result,
    channel::ChannelError,
    common::{ErrorCategory, ErrorSeverity, ResultExt, TrafficManagerError},
    validation::ValidationError,
};
