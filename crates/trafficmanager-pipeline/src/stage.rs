//! Stage trait and the per-thread stage loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

use trafficmanager_errors::ChannelError;
use trafficmanager_messenger::Messenger;

use crate::report::StageReport;

/// One concurrent processing step of the agent pipeline.
///
/// A stage consumes packets from its inbound link and may emit one packet per
/// input to its outbound link. Returning `None` drops the packet.
pub trait Stage: Send + 'static {
    /// Packet type read from the inbound link.
    type Input: Send + 'static;
    /// Packet type written to the outbound link.
    type Output: Send + 'static;

    /// Stage name, used for the thread name and in reports.
    fn name(&self) -> &str;

    /// Handle one packet.
    fn process(&mut self, input: Self::Input) -> Option<Self::Output>;
}

#[derive(Debug, Default)]
pub(crate) struct StageCounters {
    processed: AtomicU64,
    forwarded: AtomicU64,
    dropped: AtomicU64,
}

impl StageCounters {
    pub(crate) fn report(&self, name: &str, panicked: bool) -> StageReport {
        StageReport {
            name: name.to_string(),
            processed: self.processed.load(Ordering::Relaxed),
            forwarded: self.forwarded.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            panicked,
        }
    }
}

pub(crate) struct StageLoop<S: Stage> {
    pub(crate) stage: S,
    pub(crate) inbound: Arc<Messenger<S::Input>>,
    pub(crate) outbound: Option<Arc<Messenger<S::Output>>>,
    pub(crate) shutdown: Arc<AtomicBool>,
    pub(crate) counters: Arc<StageCounters>,
    pub(crate) backoff: Duration,
}

impl<S: Stage> StageLoop<S> {
    pub(crate) fn run(mut self) {
        tracing::debug!(stage = self.stage.name(), "Stage started");

        while !self.shutdown.load(Ordering::Acquire) {
            match self.inbound.receive() {
                Ok(packet) => {
                    self.counters.processed.fetch_add(1, Ordering::Relaxed);
                    match self.stage.process(packet) {
                        Some(output) => self.forward(output),
                        None => {
                            self.counters.dropped.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                }
                Err(ChannelError::Stopped) => thread::sleep(self.backoff),
                Err(ChannelError::Empty) => thread::yield_now(),
            }
        }

        tracing::debug!(
            stage = self.stage.name(),
            processed = self.counters.processed.load(Ordering::Relaxed),
            "Stage stopped"
        );
    }

    fn forward(&self, output: S::Output) {
        let Some(outbound) = &self.outbound else {
            self.counters.forwarded.fetch_add(1, Ordering::Relaxed);
            return;
        };

        let mut packet = output;
        loop {
            match outbound.send(packet) {
                Ok(()) => {
                    self.counters.forwarded.fetch_add(1, Ordering::Relaxed);
                    return;
                }
                Err(_) if self.shutdown.load(Ordering::Acquire) => {
                    self.counters.dropped.fetch_add(1, Ordering::Relaxed);
                    return;
                }
                Err(rejected) => {
                    // Link paused; hold the packet until it resumes.
                    packet = rejected.into_inner();
                    thread::sleep(self.backoff);
                }
            }
        }
    }
}
