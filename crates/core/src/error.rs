#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Invalid base64 payload: {0}")]
    InvalidPayload(#[from] base64::DecodeError),

    #[error("Unreadable image: {0}")]
    UnreadableImage(String),
}
