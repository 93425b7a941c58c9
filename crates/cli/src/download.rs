//! Writing edited images into the output directory.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use prodshot_core::error::CoreError;
use prodshot_core::naming::{download_filename, numbered_filename};
use prodshot_pipeline::ItemView;
use tokio::io::AsyncWriteExt;

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("Item has no edited image")]
    NoResult,

    #[error(transparent)]
    Decode(#[from] CoreError),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Saves edited images under their download filenames, never overwriting
/// an earlier file.
#[derive(Debug)]
pub struct DownloadWriter {
    out_dir: PathBuf,
    taken: HashSet<String>,
}

impl DownloadWriter {
    /// Create the output directory if needed.
    pub async fn create(out_dir: impl Into<PathBuf>) -> Result<Self, DownloadError> {
        let out_dir = out_dir.into();
        tokio::fs::create_dir_all(&out_dir)
            .await
            .map_err(|source| DownloadError::Write {
                path: out_dir.clone(),
                source,
            })?;
        Ok(Self {
            out_dir,
            taken: HashSet::new(),
        })
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Write the item's edited image and return the path written.
    ///
    /// Tries `name`, `name-1`, `name-2`, ... and writes to the first one
    /// that neither this writer used nor exists on disk.
    pub async fn save(&mut self, view: &ItemView) -> Result<PathBuf, DownloadError> {
        let result = view.result.as_ref().ok_or(DownloadError::NoResult)?;
        let bytes = result.decode()?;

        let name = download_filename(&view.name);
        let mut n = 0;
        let (path, mut file) = loop {
            let candidate = match n {
                0 => name.clone(),
                n => numbered_filename(&name, n),
            };
            n += 1;
            if self.taken.contains(&candidate) {
                continue;
            }

            let path = self.out_dir.join(&candidate);
            match create_new(&path).await {
                Ok(file) => {
                    self.taken.insert(candidate);
                    break (path, file);
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(source) => return Err(DownloadError::Write { path, source }),
            }
        };

        let written = async {
            file.write_all(&bytes).await?;
            file.flush().await
        };
        written.await.map_err(|source| DownloadError::Write {
            path: path.clone(),
            source,
        })?;

        tracing::info!(item_id = %view.id, path = %path.display(), "Saved edited image");
        Ok(path)
    }
}

/// Open `path` for writing, failing with `AlreadyExists` if anything is there.
async fn create_new(path: &Path) -> std::io::Result<tokio::fs::File> {
    tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
}
