//! Per-image processing pipeline.
//!
//! A batch of raw inputs becomes a set of tracked items, each driven by its
//! own task: read and encode the source, send it to the remote editor, and
//! report the outcome back to the tracker by item id.
//!
//! - [`ItemTracker`] owns the keyed item collection and is its only writer.
//! - [`BatchController`] creates items and launches one task per item.
//! - [`encoder`] turns a byte source into a base64 payload.
//! - [`preview`] scopes the locally-held displayable reference of each item.
//! - [`events`] broadcasts item transitions to observers.

pub mod controller;
pub mod encoder;
pub mod events;
pub mod input;
pub mod preview;
pub mod tracker;

pub use controller::{BatchController, PipelineError};
pub use events::{ItemEvent, ItemEventBus};
pub use input::{ByteSource, RawInput};
pub use preview::{PreviewHandle, PreviewRegistry};
pub use tracker::{ItemState, ItemTracker, ItemView, StatusCounts, TrackedItem};
