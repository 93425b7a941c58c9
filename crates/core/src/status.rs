//! Per-item processing status.

use serde::{Deserialize, Serialize};

pub const STATUS_PROCESSING: &str = "processing";
pub const STATUS_DONE: &str = "done";
pub const STATUS_ERROR: &str = "error";

/// Lifecycle of one tracked image.
///
/// `Processing` is the only initial state; `Done` and `Error` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Processing,
    Done,
    Error,
}

impl ItemStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemStatus::Processing => STATUS_PROCESSING,
            ItemStatus::Done => STATUS_DONE,
            ItemStatus::Error => STATUS_ERROR,
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, ItemStatus::Processing)
    }
}
