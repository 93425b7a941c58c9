use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use prodshot_core::error::CoreError;
use prodshot_core::media::MediaType;

/// Where the raw bytes of an input image live.
///
/// Cloning is cheap: paths are copied, in-memory bytes are shared.
#[derive(Clone)]
pub enum ByteSource {
    Path(PathBuf),
    Memory(Arc<[u8]>),
}

impl ByteSource {
    /// Human-readable location used by the presentation layer.
    pub fn describe(&self) -> String {
        match self {
            ByteSource::Path(path) => path.display().to_string(),
            ByteSource::Memory(bytes) => format!("<{} bytes in memory>", bytes.len()),
        }
    }
}

impl fmt::Debug for ByteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ByteSource::Path(path) => f.debug_tuple("Path").field(path).finish(),
            ByteSource::Memory(bytes) => f.debug_tuple("Memory").field(&bytes.len()).finish(),
        }
    }
}

/// One submitted image before it becomes a tracked item.
#[derive(Debug, Clone)]
pub struct RawInput {
    /// Display name, normally the file name.
    pub name: String,
    /// Declared media type.
    pub media_type: MediaType,
    pub source: ByteSource,
}

impl RawInput {
    /// Describe a file on disk. The media type comes from the extension;
    /// the file itself is not touched until its task reads it.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let media_type = MediaType::from_path(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            name,
            media_type,
            source: ByteSource::Path(path.to_path_buf()),
        })
    }

    pub fn from_bytes(name: impl Into<String>, media_type: MediaType, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            media_type,
            source: ByteSource::Memory(bytes.into()),
        }
    }
}
