//! Contract for remote image-editing services.
//!
//! The pipeline only knows about [`ImageEditor`]; the Gemini crate provides
//! the production implementation and tests plug in scripted editors.

use std::io::Cursor;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::encoding::decode_base64;
use crate::error::CoreError;
use crate::media::MediaType;

/// Message used when the service answers without any image part.
pub const NO_IMAGE_MESSAGE: &str = "API did not return an image.";

/// An edited image as returned by the service: a base64 payload plus the
/// mime type the service declared for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditedImage {
    pub data: String,
    pub mime_type: String,
}

impl EditedImage {
    pub fn new(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Decode the payload into raw image bytes.
    pub fn decode(&self) -> Result<Vec<u8>, CoreError> {
        decode_base64(&self.data)
    }

    /// Read width and height from the image header without a full decode.
    pub fn dimensions(&self) -> Result<(u32, u32), CoreError> {
        let bytes = self.decode()?;
        image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| CoreError::UnreadableImage(e.to_string()))?
            .into_dimensions()
            .map_err(|e| CoreError::UnreadableImage(e.to_string()))
    }
}

/// Single failure shape of a remote edit. The message carries the
/// transport or service detail for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("Failed to edit image: {0}")]
    Failed(String),
}

impl EditError {
    pub fn no_image() -> Self {
        EditError::Failed(NO_IMAGE_MESSAGE.to_string())
    }

    /// No image, with the reason the service gave for withholding it.
    pub fn blocked(reason: &str) -> Self {
        EditError::Failed(format!("{NO_IMAGE_MESSAGE} (blocked: {reason})"))
    }
}

/// A remote service that applies the fixed editing instruction to one image.
///
/// One call is one attempt: implementations must not retry internally.
#[async_trait]
pub trait ImageEditor: Send + Sync {
    /// Edit a base64-encoded image of the given media type.
    async fn edit(&self, encoded_image: &str, media_type: MediaType)
        -> Result<EditedImage, EditError>;
}
