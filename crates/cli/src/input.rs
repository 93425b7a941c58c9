//! Turning command-line arguments and pasted text into pipeline inputs.
//!
//! Dragging files onto a terminal pastes their paths, quoted or
//! backslash-escaped depending on the terminal; [`split_dropped_paths`]
//! undoes that.

use std::path::{Path, PathBuf};

use prodshot_pipeline::RawInput;

/// A path that was not turned into an input, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPath {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct CollectedInputs {
    pub inputs: Vec<RawInput>,
    pub skipped: Vec<SkippedPath>,
}

/// Build inputs from paths. Directories contribute their direct entries
/// in name order; files of other kinds are skipped, wherever they come from.
pub fn collect_inputs(paths: &[PathBuf]) -> CollectedInputs {
    let mut collected = CollectedInputs::default();

    for path in paths {
        if path.is_dir() {
            match list_dir(path) {
                Ok(entries) => {
                    for entry in &entries {
                        collected.add(entry);
                    }
                }
                Err(e) => collected.skip(path, e.to_string()),
            }
            continue;
        }
        collected.add(path);
    }

    collected
}

impl CollectedInputs {
    fn add(&mut self, path: &Path) {
        match RawInput::from_path(path) {
            Ok(input) => self.inputs.push(input),
            Err(e) => self.skip(path, e.to_string()),
        }
    }

    fn skip(&mut self, path: &Path, reason: String) {
        self.skipped.push(SkippedPath {
            path: path.to_path_buf(),
            reason,
        });
    }
}

fn list_dir(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            entries.push(entry.path());
        }
    }
    entries.sort();
    Ok(entries)
}

/// Split a pasted line into paths.
///
/// Whitespace separates paths unless quoted (`'...'`, `"..."`) or escaped
/// with a backslash. A `file://` prefix is removed.
pub fn split_dropped_paths(line: &str) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some('"'), '\\') | (None, '\\') => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
                in_token = true;
            }
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => {
                quote = Some(c);
                in_token = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_token {
                    paths.push(to_path(&current));
                    current.clear();
                    in_token = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if in_token {
        paths.push(to_path(&current));
    }

    paths
}

fn to_path(token: &str) -> PathBuf {
    PathBuf::from(token.strip_prefix("file://").unwrap_or(token))
}
