//! # trafficmanager-messenger
//!
//! Stage-to-stage handoff channel for the traffic manager pipeline.
//!
//! A [`Messenger`] connects exactly one producer stage to one consumer stage.
//! It is a FIFO queue with an explicit running/stopped state:
//!
//! - **Running**: `send` enqueues and returns at once; `receive` blocks until a
//!   packet is available.
//! - **Stopped**: `send` hands the packet back, `receive` returns
//!   [`ChannelError::Stopped`] without waiting. Stopping wakes every thread
//!   blocked in `receive`.
//!
//! Stopping never discards queued packets; after `start` they are delivered in
//! order.
//!
//! ## Architecture
//!
//! - [`messenger`] - the channel itself
//! - [`link`] - type-erased control surface used to stop every link of a session
//! - [`stats`] - relaxed atomic counters and their snapshot
//! - [`error`] - [`SendError`], returned when sending into a stopped channel
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::thread;
//! use trafficmanager_messenger::prelude::*;
//!
//! let link = Arc::new(Messenger::named("localization->collision"));
//! let consumer = {
//!     let link = Arc::clone(&link);
//!     thread::spawn(move || link.receive())
//! };
//!
//! link.send(7_u32).ok();
//! assert_eq!(consumer.join().ok(), Some(Ok(7)));
//!
//! link.stop();
//! assert_eq!(link.receive(), Err(ChannelError::Stopped));
//! ```

#![deny(
    unsafe_op_in_unsafe_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::panic,
    missing_docs,
    missing_debug_implementations
)]
#![warn(clippy::pedantic)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod error;
pub mod link;
pub mod messenger;
pub mod stats;

pub mod prelude;

pub use error::SendError;
pub use link::Link;
pub use messenger::Messenger;
pub use stats::MessengerStats;

pub use trafficmanager_errors::{ChannelError, ChannelResult};
