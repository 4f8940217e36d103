//! Prelude for trafficmanager-messenger.
//!
//! ```rust
//! use trafficmanager_messenger::prelude::*;
//!
//! let link: Messenger<u64> = Messenger::named("planner->control");
//! link.send(1).ok();
//! assert_eq!(link.pending_count(), 1);
//! ```

pub use crate::error::SendError;
pub use crate::link::Link;
pub use crate::messenger::Messenger;
pub use crate::stats::MessengerStats;

pub use trafficmanager_errors::{ChannelError, ChannelResult};
