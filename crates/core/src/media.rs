//! Accepted image media types.
//!
//! Only PNG, JPEG and WEBP inputs are accepted, matching what the remote
//! editing service takes as inline image data.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const MIME_PNG: &str = "image/png";
pub const MIME_JPEG: &str = "image/jpeg";
pub const MIME_WEBP: &str = "image/webp";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Png,
    Jpeg,
    Webp,
}

impl MediaType {
    pub fn mime(self) -> &'static str {
        match self {
            MediaType::Png => MIME_PNG,
            MediaType::Jpeg => MIME_JPEG,
            MediaType::Webp => MIME_WEBP,
        }
    }

    /// Resolve the declared media type of a file from its extension.
    pub fn from_path(path: &Path) -> Result<Self, CoreError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .ok_or_else(|| CoreError::UnsupportedMediaType(path.display().to_string()))?;

        match ext.as_str() {
            "png" => Ok(MediaType::Png),
            "jpg" | "jpeg" => Ok(MediaType::Jpeg),
            "webp" => Ok(MediaType::Webp),
            _ => Err(CoreError::UnsupportedMediaType(path.display().to_string())),
        }
    }
}

impl FromStr for MediaType {
    type Err = CoreError;

    fn from_str(mime: &str) -> Result<Self, Self::Err> {
        match mime.trim().to_ascii_lowercase().as_str() {
            MIME_PNG => Ok(MediaType::Png),
            MIME_JPEG | "image/jpg" => Ok(MediaType::Jpeg),
            MIME_WEBP => Ok(MediaType::Webp),
            other => Err(CoreError::UnsupportedMediaType(other.to_string())),
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}
