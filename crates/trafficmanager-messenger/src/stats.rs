//! Messenger traffic counters.
//!
//! Counters use `Ordering::Relaxed`: they are diagnostics, never used to
//! synchronize the queue itself, so a snapshot may be momentarily behind the
//! queue state it is reported next to.

use core::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Point-in-time view of a messenger's traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MessengerStats {
    /// Packets accepted by `send`.
    pub sent: u64,
    /// Packets handed out by `receive`, `try_receive` or `drain`.
    pub received: u64,
    /// Packets handed back because the messenger was stopped.
    pub rejected: u64,
    /// Packets queued at the time of the snapshot.
    pub pending: usize,
}

impl MessengerStats {
    /// Whether every accepted packet has been consumed.
    #[must_use]
    pub fn is_drained(&self) -> bool {
        self.pending == 0 && self.sent == self.received
    }
}

#[derive(Debug, Default)]
pub(crate) struct MessengerCounters {
    sent: AtomicU64,
    received: AtomicU64,
    rejected: AtomicU64,
}

impl MessengerCounters {
    #[inline]
    pub(crate) fn inc_sent(&self) {
        self.sent.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_received(&self, n: u64) {
        self.received.fetch_add(n, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn inc_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, pending: usize) -> MessengerStats {
        MessengerStats {
            sent: self.sent.load(Ordering::Relaxed),
            received: self.received.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            pending,
        }
    }
}
