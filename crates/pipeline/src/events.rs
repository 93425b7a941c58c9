//! Item lifecycle events backed by a `tokio::sync::broadcast` channel.
//!
//! Events are change notifications only. Observers re-read the tracker
//! snapshot for the current state, so a lagged receiver loses nothing.

use prodshot_core::types::ItemId;
use serde::Serialize;
use tokio::sync::broadcast;

/// A change to the tracked item collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ItemEvent {
    /// A new batch replaced the collection; every item is processing.
    BatchCreated { count: usize },

    /// An item finished with an edited image.
    ItemDone { item_id: ItemId },

    /// An item failed.
    ItemFailed { item_id: ItemId, error: String },

    /// The collection was emptied.
    Cleared { count: usize },
}

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out of [`ItemEvent`]s.
pub struct ItemEventBus {
    sender: broadcast::Sender<ItemEvent>,
}

impl ItemEventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed events are dropped
    /// and slow receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    pub fn publish(&self, event: ItemEvent) {
        // Ignore the SendError: it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ItemEvent> {
        self.sender.subscribe()
    }
}

impl Default for ItemEventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
