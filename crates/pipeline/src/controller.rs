//! Batch submission and per-item task fan-out.
//!
//! [`BatchController::submit`] registers the whole batch with the tracker
//! first, then launches one task per item. Tasks are never joined as a
//! group: each reports its own outcome to the tracker by id, so a slow or
//! failing item has no effect on its siblings.

use std::sync::Arc;

use prodshot_core::editor::{EditError, EditedImage, ImageEditor};
use prodshot_core::media::MediaType;
use prodshot_core::types::ItemId;
use tracing::Instrument;

use crate::encoder::{encode, EncodeError};
use crate::input::{ByteSource, RawInput};
use crate::preview::PreviewRegistry;
use crate::tracker::{ItemTracker, TrackedItem};

/// Generic message for failures that have no recognised shape.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred.";

/// Why an item's pipeline failed. Converted to the item's error message at
/// the task boundary.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Read(#[from] EncodeError),

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error("{}", UNKNOWN_ERROR_MESSAGE)]
    Unknown,
}

/// What a task needs to process one item, detached from the tracked record.
struct ItemJob {
    id: ItemId,
    name: String,
    media_type: MediaType,
    source: ByteSource,
}

/// Turns batches of raw inputs into independently processed tracked items.
pub struct BatchController {
    tracker: Arc<ItemTracker>,
    editor: Arc<dyn ImageEditor>,
    previews: PreviewRegistry,
}

impl BatchController {
    pub fn new(editor: Arc<dyn ImageEditor>) -> Self {
        Self {
            tracker: Arc::new(ItemTracker::new()),
            editor,
            previews: PreviewRegistry::new(),
        }
    }

    pub fn tracker(&self) -> &Arc<ItemTracker> {
        &self.tracker
    }

    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    /// Submit a batch, replacing whatever the tracker held before.
    ///
    /// Every item is registered as processing before any task starts.
    /// Returns the new item ids in submission order. Must be called from
    /// within a tokio runtime.
    pub async fn submit(&self, inputs: Vec<RawInput>) -> Vec<ItemId> {
        let items: Vec<TrackedItem> = inputs
            .into_iter()
            .map(|input| TrackedItem::new(input, &self.previews))
            .collect();

        let jobs: Vec<ItemJob> = items
            .iter()
            .map(|item| ItemJob {
                id: item.id,
                name: item.name.clone(),
                media_type: item.media_type,
                source: item.source.clone(),
            })
            .collect();
        let ids: Vec<ItemId> = jobs.iter().map(|job| job.id).collect();

        self.tracker.create_batch(items).await;

        for job in jobs {
            self.spawn_item(job);
        }

        ids
    }

    /// Drop the current batch and release its previews.
    ///
    /// Tasks still in flight keep running; their late updates target ids
    /// the tracker no longer holds and are ignored.
    pub async fn reset(&self) {
        self.tracker.clear().await;
    }

    fn spawn_item(&self, job: ItemJob) {
        let tracker = Arc::clone(&self.tracker);
        let editor = Arc::clone(&self.editor);
        let span = tracing::info_span!("item", item_id = %job.id, name = %job.name);
        let id = job.id;

        tokio::spawn(
            async move {
                // Run the pipeline in its own task so a panic surfaces as a
                // JoinError here instead of leaving the item processing.
                let outcome = match tokio::spawn(run_item(job, editor).in_current_span()).await {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        tracing::error!(error = %e, "Item task aborted");
                        Err(PipelineError::Unknown)
                    }
                };

                match outcome {
                    Ok(edited) => {
                        tracker.mark_done(id, edited).await;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Item failed");
                        tracker.mark_error(id, e.to_string()).await;
                    }
                }
            }
            .instrument(span),
        );
    }
}

/// Encode, then edit. Both steps suspend; nothing else is shared.
async fn run_item(
    job: ItemJob,
    editor: Arc<dyn ImageEditor>,
) -> Result<EditedImage, PipelineError> {
    tracing::debug!(media_type = %job.media_type, "Encoding source");
    let encoded = encode(&job.source).await?;

    tracing::debug!(payload_len = encoded.len(), "Sending to editor");
    let edited = editor.edit(&encoded, job.media_type).await?;

    Ok(edited)
}
