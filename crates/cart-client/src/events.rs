//! Process-wide cart-changed signal.
//!
//! One named signal with no payload, meaning "re-read cart state now".
//! Widgets that mutate the cart broadcast it; widgets that display the cart
//! subscribe and re-fetch. There is never a direct widget-to-widget call,
//! and no widget owns the channel - the handle is cloned into each one.

use tokio::sync::broadcast;

/// The cart-changed notification. Carries no payload; receivers re-fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartChanged;

/// Cloneable handle on the process-wide cart event channel.
#[derive(Debug, Clone)]
pub struct CartEvents {
    sender: broadcast::Sender<CartChanged>,
}

impl CartEvents {
    /// Create a fresh channel. One per process; widgets receive clones.
    #[must_use]
    pub fn new() -> Self {
        // Receivers only ever react to the latest signal, so a small buffer
        // is plenty even if a burst of mutations lands before a widget polls
        let (sender, _) = broadcast::channel(16);
        Self { sender }
    }

    /// Subscribe to cart-changed notifications. Dropping the receiver
    /// unsubscribes.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CartChanged> {
        self.sender.subscribe()
    }

    /// Broadcast that the cart changed. A send with no live subscribers is
    /// not an error; the mutating widget already has the fresh snapshot.
    pub fn notify(&self) {
        let _ = self.sender.send(CartChanged);
    }
}

impl Default for CartEvents {
    fn default() -> Self {
        Self::new()
    }
}
