//! Text projection of the tracker state.
//!
//! Every function here is pure: given the same snapshot it produces the
//! same text. The session decides when to print.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use prodshot_core::status::ItemStatus;
use prodshot_core::types::ItemId;
use prodshot_pipeline::{ItemView, StatusCounts};

pub const HEADER_TITLE: &str = "AI Product Photo Studio";
pub const HEADER_TAGLINE: &str = "Generate professional e-commerce images in seconds";
pub const UPLOAD_PROMPT: &str = "Upload one or more images (PNG, JPG, or WEBP)";
pub const LOADER_TITLE: &str = "Generating your image...";
pub const LOADER_HINT: &str = "This may take a few moments.";
pub const FAILED_TITLE: &str = "Processing Failed";
pub const ANOTHER_BATCH_PROMPT: &str =
    "Process Another Batch: enter image paths (blank line to quit)";

pub fn render_header() -> String {
    format!("{HEADER_TITLE}\n{HEADER_TAGLINE}\n")
}

pub fn render_empty() -> String {
    format!("{UPLOAD_PROMPT}\n")
}

/// One item block: title, original pane, then the state pane.
///
/// `saved` is where the edited image was written, if it was.
pub fn render_item(view: &ItemView, saved: Option<&Path>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", view.name);
    let _ = writeln!(out, "  Original Image: {}", view.preview);

    match view.status {
        ItemStatus::Processing => {
            let _ = writeln!(out, "  {LOADER_TITLE} {LOADER_HINT}");
        }
        ItemStatus::Done => {
            let _ = write!(out, "  Edited Image:");
            if let Some(result) = &view.result {
                if let Ok((w, h)) = result.dimensions() {
                    let _ = write!(out, " {w}x{h}");
                }
            }
            if let Some(elapsed) = view.elapsed() {
                let _ = write!(out, " in {}", format_elapsed(elapsed));
            }
            out.push('\n');
            match saved {
                Some(path) => {
                    let _ = writeln!(out, "  Saved to {}", path.display());
                }
                None => {
                    let _ = writeln!(out, "  Not saved");
                }
            }
        }
        ItemStatus::Error => {
            let _ = writeln!(out, "  {FAILED_TITLE}");
            if let Some(error) = &view.error {
                let _ = writeln!(out, "  {error}");
            }
        }
    }

    out
}

/// The whole collection in submission order, or the upload prompt when
/// there is nothing to show.
pub fn render_snapshot(views: &[ItemView], saved: &HashMap<ItemId, PathBuf>) -> String {
    if views.is_empty() {
        return render_empty();
    }

    views
        .iter()
        .map(|view| render_item(view, saved.get(&view.id).map(PathBuf::as_path)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_summary(counts: StatusCounts) -> String {
    format!(
        "{} done, {} failed, {} processing ({} total)\n",
        counts.done,
        counts.error,
        counts.processing,
        counts.total()
    )
}

fn format_elapsed(elapsed: chrono::Duration) -> String {
    let millis = elapsed.num_milliseconds().max(0);
    format!("{}.{}s", millis / 1000, (millis % 1000) / 100)
}
