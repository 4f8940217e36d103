//! Type-erased control surface of a messenger.
//!
//! A session wires links with different packet types; teardown still has to
//! stop all of them before joining stage threads. [`Link`] is the object-safe
//! subset of [`Messenger`] that makes that possible.

use crate::messenger::Messenger;
use crate::stats::MessengerStats;

/// Control and observability operations shared by every messenger.
pub trait Link: Send + Sync {
    /// Name used in logs and reports.
    fn name(&self) -> &str;
    /// Stop the link and release blocked receivers.
    fn stop(&self);
    /// Resume the link.
    fn start(&self);
    /// Whether the link is running.
    fn is_running(&self) -> bool;
    /// Number of queued packets.
    fn pending_count(&self) -> usize;
    /// Traffic counters.
    fn stats(&self) -> MessengerStats;
}

impl<T: Send> Link for Messenger<T> {
    fn name(&self) -> &str {
        Messenger::name(self)
    }

    fn stop(&self) {
        Messenger::stop(self);
    }

    fn start(&self) {
        Messenger::start(self);
    }

    fn is_running(&self) -> bool {
        Messenger::is_running(self)
    }

    fn pending_count(&self) -> usize {
        Messenger::pending_count(self)
    }

    fn stats(&self) -> MessengerStats {
        Messenger::stats(self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_heterogeneous_links_stop_together() {
        let numbers = Arc::new(Messenger::<u32>::named("numbers"));
        let words = Arc::new(Messenger::<String>::named("words"));
        let links: Vec<Arc<dyn Link>> = vec![numbers.clone(), words.clone()];

        numbers.send(1).unwrap();
        for link in &links {
            link.stop();
        }

        assert!(!numbers.is_running());
        assert!(!words.is_running());
        assert_eq!(links[0].pending_count(), 1);
        assert_eq!(links[1].name(), "words");
    }
}
