//! REST client for the Gemini `generateContent` endpoint.
//!
//! Wraps the HTTP call using [`reqwest`]. One call is one request: no
//! retries and no client-side timeout.

use crate::config::GeminiConfig;
use crate::messages::{ErrorEnvelope, GenerateContentRequest, GenerateContentResponse};

/// Header carrying the static API credential.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// HTTP client for one Gemini model.
pub struct GeminiApi {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

/// Errors from the Gemini REST layer.
#[derive(Debug, thiserror::Error)]
pub enum GeminiApiError {
    /// The HTTP request itself failed (network, DNS, TLS, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Gemini returned a non-2xx status code.
    #[error("Gemini API error ({status}): {message}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Service message, or the raw body when it is not a Google error envelope.
        message: String,
    },
}

impl GeminiApi {
    pub fn new(config: &GeminiConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: &GeminiConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Full URL of the `generateContent` endpoint for the configured model.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// Send a `generateContent` request and parse the response.
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiApiError> {
        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(request)
            .send()
            .await?;
        let status = response.status().as_u16();

        let mut body: GenerateContentResponse = Self::parse_response(response).await?;
        if let Some(error) = body.error.take() {
            return Err(GeminiApiError::ApiError {
                status: error.code.unwrap_or(status),
                message: error.message,
            });
        }
        Ok(body)
    }

    // ---- private helpers ----

    /// Return the response unchanged on success, or an
    /// [`GeminiApiError::ApiError`] with the service message on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, GeminiApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            let message = match serde_json::from_str::<ErrorEnvelope>(&body) {
                Ok(envelope) => envelope.error.message,
                Err(_) => body,
            };
            return Err(GeminiApiError::ApiError {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GeminiApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}
