use std::fmt;

/// Default image-capable model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";

/// Public Generative Language API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Connection settings for the Gemini API, loaded from the environment.
#[derive(Clone)]
pub struct GeminiConfig {
    /// Static service credential, sent as `x-goog-api-key`.
    pub api_key: String,
    /// Model name used in the `generateContent` path.
    pub model: String,
    /// Base URL without a trailing slash.
    pub base_url: String,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different endpoint (e.g. a local mock).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var           | Default                                     |
    /// |-------------------|---------------------------------------------|
    /// | `API_KEY`         | required (falls back to `GEMINI_API_KEY`)   |
    /// | `GEMINI_MODEL`    | `gemini-2.5-flash-image`                    |
    /// | `GEMINI_BASE_URL` | `https://generativelanguage.googleapis.com` |
    pub fn from_env() -> Result<Self, GeminiConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reading through `lookup`.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, GeminiConfigError> {
        let api_key = lookup("API_KEY")
            .or_else(|| lookup("GEMINI_API_KEY"))
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(GeminiConfigError::MissingApiKey)?;

        let mut config = Self::new(api_key);
        if let Some(model) = lookup("GEMINI_MODEL").filter(|m| !m.trim().is_empty()) {
            config = config.with_model(model.trim());
        }
        if let Some(url) = lookup("GEMINI_BASE_URL").filter(|u| !u.trim().is_empty()) {
            config = config.with_base_url(url.trim());
        }
        Ok(config)
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GeminiConfigError {
    #[error("API_KEY environment variable not set")]
    MissingApiKey,
}
