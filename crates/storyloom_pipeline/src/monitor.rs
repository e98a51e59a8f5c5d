//! Watch-channel connectivity monitor.

use storyloom_interface::NetworkMonitor;
use tokio::sync::watch;

/// Connectivity monitor backed by a `tokio::sync::watch` channel.
///
/// The application shell (or a test) drives it with
/// [`set_connected`](WatchConnectivityMonitor::set_connected); the pipeline
/// reads the current state and subscribes for the reconnect edge.
#[derive(Debug)]
pub struct WatchConnectivityMonitor {
    tx: watch::Sender<bool>,
}

impl WatchConnectivityMonitor {
    /// Create a monitor with the given initial state.
    pub fn new(connected: bool) -> Self {
        let (tx, _) = watch::channel(connected);
        Self { tx }
    }

    /// Publish a connectivity change. Subscribers only wake on actual
    /// changes; setting the same value twice is a no-op.
    pub fn set_connected(&self, connected: bool) {
        self.tx.send_if_modified(|state| {
            let changed = *state != connected;
            *state = connected;
            changed
        });
    }
}

impl Default for WatchConnectivityMonitor {
    fn default() -> Self {
        Self::new(true)
    }
}

impl NetworkMonitor for WatchConnectivityMonitor {
    fn is_connected(&self) -> bool {
        *self.tx.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_see_the_reconnect_edge() {
        let monitor = WatchConnectivityMonitor::new(false);
        let mut rx = monitor.subscribe();
        assert!(!monitor.is_connected());

        monitor.set_connected(true);
        rx.changed().await.unwrap();
        assert!(*rx.borrow());
    }

    #[tokio::test]
    async fn repeated_state_does_not_wake_subscribers() {
        let monitor = WatchConnectivityMonitor::new(true);
        let mut rx = monitor.subscribe();
        monitor.set_connected(true);
        assert!(!rx.has_changed().unwrap());
    }
}
