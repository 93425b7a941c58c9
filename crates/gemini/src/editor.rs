//! [`ImageEditor`] backed by Gemini image generation.

use async_trait::async_trait;
use prodshot_core::editor::{EditError, EditedImage, ImageEditor};
use prodshot_core::media::MediaType;
use prodshot_core::prompt::ECOMMERCE_PROMPT;

use crate::api::GeminiApi;
use crate::config::GeminiConfig;
use crate::messages::GenerateContentRequest;

/// Sends each image with the fixed e-commerce instruction and returns the
/// first image the model answers with.
pub struct GeminiEditor {
    api: GeminiApi,
}

impl GeminiEditor {
    pub fn new(config: &GeminiConfig) -> Self {
        Self {
            api: GeminiApi::new(config),
        }
    }
}

#[async_trait]
impl ImageEditor for GeminiEditor {
    async fn edit(
        &self,
        encoded_image: &str,
        media_type: MediaType,
    ) -> Result<EditedImage, EditError> {
        let request =
            GenerateContentRequest::image_edit(encoded_image, media_type.mime(), ECOMMERCE_PROMPT);

        let response = self.api.generate_content(&request).await.map_err(|e| {
            tracing::error!(model = %self.api.model(), error = %e, "Error calling Gemini API");
            EditError::Failed(e.to_string())
        })?;

        match response.first_inline_image() {
            Some(image) => {
                tracing::debug!(
                    model = %self.api.model(),
                    mime_type = %image.mime_type,
                    payload_len = image.data.len(),
                    "Gemini returned an edited image",
                );
                Ok(EditedImage::new(image.data.clone(), image.mime_type.clone()))
            }
            None => {
                let reason = response.refusal_reason();
                tracing::warn!(
                    model = %self.api.model(),
                    reason = reason.unwrap_or("none"),
                    candidates = response.candidates.len(),
                    "Gemini response contained no image",
                );
                Err(reason.map_or_else(EditError::no_image, EditError::blocked))
            }
        }
    }
}
