//! Keyed store of per-image processing records.
//!
//! [`ItemTracker`] exclusively owns the collection. Writers address one
//! item by id; every write happens under the lock, so snapshot readers
//! never see a half-applied update and two items finishing at the same
//! time cannot overwrite each other.

use indexmap::IndexMap;
use prodshot_core::editor::EditedImage;
use prodshot_core::media::MediaType;
use prodshot_core::status::ItemStatus;
use prodshot_core::types::{new_item_id, ItemId, Timestamp};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::RwLock;

use crate::events::{ItemEvent, ItemEventBus};
use crate::input::{ByteSource, RawInput};
use crate::preview::{PreviewHandle, PreviewRegistry};

// ---------------------------------------------------------------------------
// Item records
// ---------------------------------------------------------------------------

/// Processing state of one item. The result exists only when done and the
/// error message only when failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemState {
    Processing,
    Done(EditedImage),
    Error(String),
}

impl ItemState {
    pub fn status(&self) -> ItemStatus {
        match self {
            ItemState::Processing => ItemStatus::Processing,
            ItemState::Done(_) => ItemStatus::Done,
            ItemState::Error(_) => ItemStatus::Error,
        }
    }
}

/// One submitted image and where it is in the pipeline.
#[derive(Debug)]
pub struct TrackedItem {
    pub id: ItemId,
    pub name: String,
    pub media_type: MediaType,
    pub source: ByteSource,
    pub preview: PreviewHandle,
    pub state: ItemState,
    pub created_at: Timestamp,
    pub finished_at: Option<Timestamp>,
}

impl TrackedItem {
    /// Create a processing item with a fresh id, acquiring its preview.
    pub fn new(input: RawInput, previews: &PreviewRegistry) -> Self {
        let preview = previews.acquire(&input.source);
        Self {
            id: new_item_id(),
            name: input.name,
            media_type: input.media_type,
            source: input.source,
            preview,
            state: ItemState::Processing,
            created_at: chrono::Utc::now(),
            finished_at: None,
        }
    }

    fn view(&self) -> ItemView {
        let (result, error) = match &self.state {
            ItemState::Processing => (None, None),
            ItemState::Done(image) => (Some(image.clone()), None),
            ItemState::Error(msg) => (None, Some(msg.clone())),
        };
        ItemView {
            id: self.id,
            name: self.name.clone(),
            media_type: self.media_type,
            preview: self.preview.location(),
            status: self.state.status(),
            result,
            error,
            created_at: self.created_at,
            finished_at: self.finished_at,
        }
    }
}

/// Read-only copy of an item, handed to the presentation layer.
#[derive(Debug, Clone)]
pub struct ItemView {
    pub id: ItemId,
    pub name: String,
    pub media_type: MediaType,
    pub preview: String,
    pub status: ItemStatus,
    pub result: Option<EditedImage>,
    pub error: Option<String>,
    pub created_at: Timestamp,
    pub finished_at: Option<Timestamp>,
}

impl ItemView {
    /// Time from submission to the terminal transition, if reached.
    pub fn elapsed(&self) -> Option<chrono::Duration> {
        self.finished_at.map(|end| end - self.created_at)
    }
}

/// Number of items in each status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub processing: usize,
    pub done: usize,
    pub error: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.processing + self.done + self.error
    }
}

// ---------------------------------------------------------------------------
// ItemTracker
// ---------------------------------------------------------------------------

/// Owner of the tracked item collection.
///
/// Designed to be shared as `Arc<ItemTracker>` between the controller's
/// tasks (writers, by id) and the presentation layer (snapshot readers).
pub struct ItemTracker {
    /// Items in submission order, keyed by id.
    items: RwLock<IndexMap<ItemId, TrackedItem>>,
    events: ItemEventBus,
}

impl ItemTracker {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(IndexMap::new()),
            events: ItemEventBus::default(),
        }
    }

    /// Subscribe to change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<ItemEvent> {
        self.events.subscribe()
    }

    /// Replace the whole collection with a new batch.
    ///
    /// The outgoing items are dropped after the lock is released, which
    /// releases their preview handles.
    pub async fn create_batch(&self, batch: Vec<TrackedItem>) {
        let count = batch.len();
        let incoming: IndexMap<ItemId, TrackedItem> =
            batch.into_iter().map(|item| (item.id, item)).collect();

        let outgoing = {
            let mut items = self.items.write().await;
            std::mem::replace(&mut *items, incoming)
        };

        if !outgoing.is_empty() {
            tracing::debug!(released = outgoing.len(), "Superseded previous batch");
        }
        drop(outgoing);

        tracing::info!(count, "Batch created");
        self.events.publish(ItemEvent::BatchCreated { count });
    }

    /// Transition an item to done. Returns whether the update was applied.
    ///
    /// Unknown ids (e.g. a task finishing after a reset) and items that
    /// already reached a terminal state are left untouched.
    pub async fn mark_done(&self, id: ItemId, result: EditedImage) -> bool {
        let applied = self.finish(id, ItemState::Done(result)).await;
        if applied {
            self.events.publish(ItemEvent::ItemDone { item_id: id });
        }
        applied
    }

    /// Transition an item to error. Same rules as [`mark_done`](Self::mark_done).
    pub async fn mark_error(&self, id: ItemId, message: impl Into<String>) -> bool {
        let message = message.into();
        let applied = self.finish(id, ItemState::Error(message.clone())).await;
        if applied {
            self.events.publish(ItemEvent::ItemFailed {
                item_id: id,
                error: message,
            });
        }
        applied
    }

    async fn finish(&self, id: ItemId, state: ItemState) -> bool {
        let mut items = self.items.write().await;
        let Some(item) = items.get_mut(&id) else {
            tracing::debug!(item_id = %id, "Ignoring update for item no longer tracked");
            return false;
        };

        if item.state.status().is_terminal() {
            tracing::warn!(
                item_id = %id,
                current = item.state.status().as_str(),
                requested = state.status().as_str(),
                "Ignoring second transition for finished item",
            );
            return false;
        }

        tracing::info!(item_id = %id, name = %item.name, status = state.status().as_str(), "Item finished");
        item.state = state;
        item.finished_at = Some(chrono::Utc::now());
        true
    }

    /// Release every item and empty the collection. No-op when empty.
    pub async fn clear(&self) {
        let outgoing = std::mem::take(&mut *self.items.write().await);
        if outgoing.is_empty() {
            return;
        }

        let count = outgoing.len();
        drop(outgoing);

        tracing::info!(count, "Cleared tracked items");
        self.events.publish(ItemEvent::Cleared { count });
    }

    /// Views of all items in submission order.
    pub async fn snapshot(&self) -> Vec<ItemView> {
        self.items.read().await.values().map(TrackedItem::view).collect()
    }

    pub async fn get(&self, id: ItemId) -> Option<ItemView> {
        self.items.read().await.get(&id).map(TrackedItem::view)
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    pub async fn counts(&self) -> StatusCounts {
        let items = self.items.read().await;
        let mut counts = StatusCounts::default();
        for item in items.values() {
            match item.state.status() {
                ItemStatus::Processing => counts.processing += 1,
                ItemStatus::Done => counts.done += 1,
                ItemStatus::Error => counts.error += 1,
            }
        }
        counts
    }

    /// True when no item is still processing (an empty tracker is settled).
    pub async fn is_settled(&self) -> bool {
        self.counts().await.processing == 0
    }

    /// Wait until every tracked item has reached a terminal state.
    pub async fn wait_settled(&self) {
        let mut rx = self.subscribe();
        loop {
            if self.is_settled().await {
                return;
            }
            match rx.recv().await {
                Ok(_) | Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => return,
            }
        }
    }
}

impl Default for ItemTracker {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
