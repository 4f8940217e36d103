//! The blocking, stoppable handoff channel.

use std::collections::VecDeque;
use std::fmt;

use parking_lot::{Condvar, Mutex};
use trafficmanager_errors::{ChannelError, ChannelResult};

use crate::error::SendError;
use crate::stats::{MessengerCounters, MessengerStats};

struct State<T> {
    queue: VecDeque<T>,
    running: bool,
}

/// Handoff channel between one producer stage and one consumer stage.
///
/// # Thread Safety
///
/// All methods take `&self`; share the messenger between the two stages with
/// an `Arc`. The queue and the running flag live under one mutex, and every
/// state change that can release a waiter is followed by a condition variable
/// notification, so a receiver can never sleep through `send` or `stop`.
///
/// # Blocking
///
/// [`receive`](Self::receive) is the only blocking call. [`send`](Self::send)
/// holds the lock for a single `VecDeque::push_back`.
pub struct Messenger<T> {
    name: String,
    state: Mutex<State<T>>,
    available: Condvar,
    counters: MessengerCounters,
}

impl<T> Messenger<T> {
    /// Create a running messenger.
    #[must_use]
    pub fn new() -> Self {
        Self::named("messenger")
    }

    /// Create a running messenger with a name used in logs and reports.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Mutex::new(State {
                queue: VecDeque::new(),
                running: true,
            }),
            available: Condvar::new(),
            counters: MessengerCounters::default(),
        }
    }

    /// Name given at construction.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Enqueue a packet and wake one blocked receiver.
    ///
    /// Never waits for the receiver.
    ///
    /// # Errors
    ///
    /// Returns the packet inside [`SendError`] if the messenger is stopped;
    /// nothing is enqueued in that case.
    pub fn send(&self, packet: T) -> Result<(), SendError<T>> {
        {
            let mut state = self.state.lock();
            if !state.running {
                drop(state);
                self.counters.inc_rejected();
                return Err(SendError(packet));
            }
            state.queue.push_back(packet);
        }
        self.counters.inc_sent();
        self.available.notify_one();
        Ok(())
    }

    /// Take the oldest packet, blocking while the queue is empty.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Stopped`] immediately if the messenger is
    /// stopped, or as soon as it is stopped while this call is waiting. No
    /// packet is consumed in that case.
    pub fn receive(&self) -> ChannelResult<T> {
        let mut state = self.state.lock();
        loop {
            if !state.running {
                return Err(ChannelError::Stopped);
            }
            if let Some(packet) = state.queue.pop_front() {
                drop(state);
                self.counters.add_received(1);
                return Ok(packet);
            }
            self.available.wait(&mut state);
        }
    }

    /// Take the oldest packet without blocking.
    ///
    /// # Errors
    ///
    /// [`ChannelError::Stopped`] if stopped, [`ChannelError::Empty`] if running
    /// with nothing queued.
    pub fn try_receive(&self) -> ChannelResult<T> {
        let mut state = self.state.lock();
        if !state.running {
            return Err(ChannelError::Stopped);
        }
        let packet = state.queue.pop_front().ok_or(ChannelError::Empty)?;
        drop(state);
        self.counters.add_received(1);
        Ok(packet)
    }

    /// Stop the messenger and release every blocked receiver.
    ///
    /// Queued packets are kept.
    pub fn stop(&self) {
        let pending = {
            let mut state = self.state.lock();
            state.running = false;
            state.queue.len()
        };
        self.available.notify_all();
        tracing::debug!(messenger = %self.name, pending, "messenger stopped");
    }

    /// Resume normal operation; packets queued before `stop` are delivered first.
    pub fn start(&self) {
        let pending = {
            let mut state = self.state.lock();
            state.running = true;
            state.queue.len()
        };
        self.available.notify_all();
        tracing::debug!(messenger = %self.name, pending, "messenger started");
    }

    /// Whether the messenger is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state.lock().running
    }

    /// Number of queued packets.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// Remove and return every queued packet, oldest first, in any state.
    ///
    /// Used at teardown to account for work that was never consumed.
    pub fn drain(&self) -> Vec<T> {
        let drained: Vec<T> = self.state.lock().queue.drain(..).collect();
        self.counters.add_received(drained.len() as u64);
        drained
    }

    /// Traffic counters plus the current queue length.
    #[must_use]
    pub fn stats(&self) -> MessengerStats {
        self.counters.snapshot(self.pending_count())
    }
}

impl<T> Default for Messenger<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Messenger<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Messenger")
            .field("name", &self.name)
            .field("running", &state.running)
            .field("pending", &state.queue.len())
            .finish()
    }
}
