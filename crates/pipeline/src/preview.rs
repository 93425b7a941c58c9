//! Scoped preview references.
//!
//! Every tracked item holds one [`PreviewHandle`] for its original image.
//! The handle is released when it is dropped, which happens exactly once:
//! when the item's batch is replaced or the tracker is cleared.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::input::ByteSource;

#[derive(Debug, Default)]
struct Counters {
    acquired: AtomicUsize,
    released: AtomicUsize,
}

/// Hands out preview handles and keeps count of acquisitions and releases.
///
/// Cheap to clone; clones share the same counters.
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    counters: Arc<Counters>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire a preview reference for an input source.
    pub fn acquire(&self, source: &ByteSource) -> PreviewHandle {
        self.counters.acquired.fetch_add(1, Ordering::SeqCst);
        PreviewHandle {
            source: source.clone(),
            counters: Arc::clone(&self.counters),
        }
    }

    /// Handles acquired and not yet released.
    pub fn live(&self) -> usize {
        self.acquired() - self.released()
    }

    pub fn acquired(&self) -> usize {
        self.counters.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.counters.released.load(Ordering::SeqCst)
    }
}

/// A displayable reference to an item's original image.
///
/// Not `Clone`: exactly one owner, released on drop.
#[derive(Debug)]
pub struct PreviewHandle {
    source: ByteSource,
    counters: Arc<Counters>,
}

impl PreviewHandle {
    /// Location to show for the original image.
    pub fn location(&self) -> String {
        self.source.describe()
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.counters.released.fetch_add(1, Ordering::SeqCst);
        tracing::trace!(location = %self.source.describe(), "Preview released");
    }
}
