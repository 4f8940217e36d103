//! Session teardown report.

use serde::Serialize;
use trafficmanager_messenger::MessengerStats;

/// Counters of one stage thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport {
    /// Stage name.
    pub name: String,
    /// Packets taken from the inbound link.
    pub processed: u64,
    /// Outputs accepted downstream; for a stage without an outbound link,
    /// outputs produced.
    pub forwarded: u64,
    /// Packets the stage filtered out or could not deliver during shutdown.
    pub dropped: u64,
    /// The stage thread panicked.
    pub panicked: bool,
}

/// Final state of one messenger link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkReport {
    /// Link name.
    pub name: String,
    /// Counters at teardown.
    pub stats: MessengerStats,
}

/// Summary returned by [`Session::shutdown`](crate::Session::shutdown).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionReport {
    /// One entry per spawned stage, in spawn order.
    pub stages: Vec<StageReport>,
    /// One entry per link, in creation order.
    pub links: Vec<LinkReport>,
}

impl SessionReport {
    /// Packets still queued on any link.
    #[must_use]
    pub fn pending_packets(&self) -> usize {
        self.links.iter().map(|link| link.stats.pending).sum()
    }

    /// True if any stage thread panicked.
    #[must_use]
    pub fn any_panicked(&self) -> bool {
        self.stages.iter().any(|stage| stage.panicked)
    }

    /// Report for the stage called `name`.
    #[must_use]
    pub fn stage(&self, name: &str) -> Option<&StageReport> {
        self.stages.iter().find(|stage| stage.name == name)
    }
}
