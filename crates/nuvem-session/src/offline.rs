//! Connectivity state shared across the application.
//!
//! Offline is an event-driven flag, not a polling loop: whatever detects
//! connectivity changes (a failed request, a platform event) flips the
//! flag, and interested components hold a [`tokio::sync::watch`] receiver.

use tokio::sync::watch;
use tracing::info;

/// Publishes the offline flag to any number of subscribers.
#[derive(Debug)]
pub struct OfflineMonitor {
    tx: watch::Sender<bool>,
}

impl OfflineMonitor {
    /// Start in the online state.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// Flip the connectivity flag. Subscribers observe the change on
    /// their next read; no notification is sent when the value is equal.
    pub fn set_offline(&self, offline: bool) {
        let changed = self.tx.send_if_modified(|current| {
            if *current == offline {
                return false;
            }
            *current = offline;
            true
        });
        if changed {
            info!(offline, "Connectivity state changed");
        }
    }

    /// Current state.
    pub fn is_offline(&self) -> bool {
        *self.tx.borrow()
    }

    /// A receiver for components that need to read (or await) the flag.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl Default for OfflineMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_starts_online() {
        let monitor = OfflineMonitor::new();
        assert!(!monitor.is_offline());
        assert!(!*monitor.subscribe().borrow());
    }

    #[tokio::test]
    async fn test_subscribers_observe_transitions() {
        let monitor = OfflineMonitor::new();
        let rx = monitor.subscribe();

        monitor.set_offline(true);
        assert!(*rx.borrow());
        monitor.set_offline(false);
        assert!(!*rx.borrow());
    }

    #[tokio::test]
    async fn test_redundant_set_does_not_notify() {
        let monitor = OfflineMonitor::new();
        let mut rx = monitor.subscribe();
        rx.borrow_and_update();

        monitor.set_offline(false);
        assert!(!rx.has_changed().unwrap());
        monitor.set_offline(true);
        assert!(rx.has_changed().unwrap());
    }
}
