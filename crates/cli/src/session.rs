//! One run of the studio: batches in, rendered progress and files out.

use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::path::PathBuf;

use prodshot_core::types::ItemId;
use prodshot_pipeline::{BatchController, ItemView, RawInput, StatusCounts};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tokio::sync::broadcast::error::RecvError;

use crate::download::DownloadWriter;
use crate::input::{collect_inputs, split_dropped_paths};
use crate::render::{
    render_empty, render_header, render_item, render_snapshot, render_summary,
    ANOTHER_BATCH_PROMPT, UPLOAD_PROMPT,
};

/// Drives batches through the controller and reports them on `out`.
pub struct Session<W> {
    controller: BatchController,
    downloads: DownloadWriter,
    /// Where each done item of the current batch was written.
    saved: HashMap<ItemId, PathBuf>,
    /// Terminal items of the current batch already printed.
    reported: HashSet<ItemId>,
    /// Done items of the current batch whose image could not be written.
    unsaved: usize,
    out: W,
}

impl<W: Write> Session<W> {
    pub fn new(controller: BatchController, downloads: DownloadWriter, out: W) -> Self {
        Self {
            controller,
            downloads,
            saved: HashMap::new(),
            reported: HashSet::new(),
            unsaved: 0,
            out,
        }
    }

    pub fn controller(&self) -> &BatchController {
        &self.controller
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Done items of the last batch that could not be saved.
    pub fn unsaved(&self) -> usize {
        self.unsaved
    }

    /// Process the initial paths, then, in interactive mode, keep asking
    /// for another batch until a blank line or end of input.
    ///
    /// With no initial paths the first batch is read from `reader` too.
    /// A non-interactive run fails if any image failed or could not be
    /// saved.
    pub async fn run<R>(
        &mut self,
        initial: &[PathBuf],
        interactive: bool,
        reader: R,
    ) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = reader.lines();
        write!(self.out, "{}", render_header())?;

        let mut paths = initial.to_vec();
        if paths.is_empty() {
            match self.prompt(&mut lines, UPLOAD_PROMPT).await? {
                Some(p) => paths = p,
                None => return Ok(()),
            }
        }

        let mut failed = 0;
        loop {
            let counts = self.process_paths(&paths).await?;
            failed += counts.error + self.unsaved;

            if !interactive {
                break;
            }
            match self.prompt(&mut lines, ANOTHER_BATCH_PROMPT).await? {
                Some(p) => {
                    self.controller.reset().await;
                    paths = p;
                }
                None => break,
            }
        }

        self.controller.reset().await;
        self.out.flush()?;

        if failed > 0 && !interactive {
            anyhow::bail!("{failed} image(s) failed");
        }
        Ok(())
    }

    /// Submit one batch and report every item as it settles.
    ///
    /// Returns the final counts. Each edited image is written to the output
    /// directory as soon as its item is done.
    pub async fn run_batch(&mut self, inputs: Vec<RawInput>) -> anyhow::Result<StatusCounts> {
        self.saved.clear();
        self.reported.clear();
        self.unsaved = 0;

        let tracker = self.controller.tracker().clone();
        // Subscribe before submitting so no transition is missed.
        let mut rx = tracker.subscribe();
        self.controller.submit(inputs).await;

        let views = tracker.snapshot().await;
        writeln!(self.out, "{}", render_snapshot(&views, &self.saved))?;

        loop {
            self.report_finished(tracker.snapshot().await).await?;
            if tracker.is_settled().await {
                break;
            }
            match rx.recv().await {
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Event receiver lagged, resyncing from snapshot");
                }
                Err(RecvError::Closed) => break,
            }
        }

        let counts = tracker.counts().await;
        write!(self.out, "{}", render_summary(counts))?;
        self.out.flush()?;
        Ok(counts)
    }

    async fn process_paths(&mut self, paths: &[PathBuf]) -> anyhow::Result<StatusCounts> {
        self.unsaved = 0;
        let collected = collect_inputs(paths);
        for skipped in &collected.skipped {
            tracing::warn!(path = %skipped.path.display(), reason = %skipped.reason, "Skipping input");
            writeln!(self.out, "Skipped {}: {}", skipped.path.display(), skipped.reason)?;
        }

        if collected.inputs.is_empty() {
            write!(self.out, "{}", render_empty())?;
            return Ok(StatusCounts::default());
        }
        self.run_batch(collected.inputs).await
    }

    /// Print items that reached a terminal state since the last call,
    /// saving the done ones first.
    async fn report_finished(&mut self, views: Vec<ItemView>) -> anyhow::Result<()> {
        for view in views {
            if !view.status.is_terminal() || !self.reported.insert(view.id) {
                continue;
            }

            if view.result.is_some() {
                match self.downloads.save(&view).await {
                    Ok(path) => {
                        self.saved.insert(view.id, path);
                    }
                    Err(e) => {
                        self.unsaved += 1;
                        tracing::error!(item_id = %view.id, error = %e, "Failed to save edited image");
                        writeln!(self.out, "Could not save {}: {e}", view.name)?;
                    }
                }
            }

            let saved = self.saved.get(&view.id).map(PathBuf::as_path);
            writeln!(self.out, "{}", render_item(&view, saved))?;
        }
        Ok(())
    }

    async fn prompt<R>(
        &mut self,
        lines: &mut Lines<R>,
        message: &str,
    ) -> anyhow::Result<Option<Vec<PathBuf>>>
    where
        R: AsyncBufRead + Unpin,
    {
        write!(self.out, "{message}\n> ")?;
        self.out.flush()?;

        let Some(line) = lines.next_line().await? else {
            return Ok(None);
        };
        let paths = split_dropped_paths(&line);
        Ok((!paths.is_empty()).then_some(paths))
    }
}
