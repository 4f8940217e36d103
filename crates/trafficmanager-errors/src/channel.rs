//! Channel availability errors.
//!
//! A stage talking to a stopped messenger is a normal condition during pause
//! and teardown, so these errors are `Copy`, allocation free and carry a stable
//! numeric code for compact logging.

use core::fmt;

use crate::common::ErrorSeverity;

/// Reasons a messenger could not hand over a packet.
///
/// # Examples
///
/// ```
/// use trafficmanager_errors::{ChannelError, ErrorSeverity};
///
/// let err = ChannelError::Stopped;
/// assert_eq!(err.code(), 1);
/// assert_eq!(err.severity(), ErrorSeverity::Info);
/// assert!(err.should_back_off());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ChannelError {
    /// The channel is stopped; nothing was sent or received.
    Stopped = 1,
    /// The channel is running but no packet is queued (non-blocking receive only).
    Empty = 2,
}

impl ChannelError {
    /// Get the numeric error code.
    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Create an error from a code.
    ///
    /// Returns `None` if the code does not correspond to a known error.
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(ChannelError::Stopped),
            2 => Some(ChannelError::Empty),
            _ => None,
        }
    }

    /// Get the error severity.
    #[must_use]
    pub fn severity(self) -> ErrorSeverity {
        match self {
            ChannelError::Stopped => ErrorSeverity::Info,
            ChannelError::Empty => ErrorSeverity::Info,
        }
    }

    /// Whether the caller should back off before retrying.
    ///
    /// An empty channel can be polled again at once; a stopped one will not
    /// change until someone calls `start`.
    #[must_use]
    pub fn should_back_off(self) -> bool {
        matches!(self, ChannelError::Stopped)
    }
}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelError::Stopped => write!(f, "Channel stopped"),
            ChannelError::Empty => write!(f, "Channel empty"),
        }
    }
}

impl std::error::Error for ChannelError {}
