//! Read an input and produce its base64 payload.

use prodshot_core::encoding::{encode_base64, strip_data_url_prefix};

use crate::input::ByteSource;

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("Failed to read {location}: {source}")]
    Read {
        location: String,
        #[source]
        source: std::io::Error,
    },
}

/// Encode a byte source as base64, with no `data:` declaration prefix.
///
/// File sources are read asynchronously; this is the first suspension point
/// of an item's task.
pub async fn encode(source: &ByteSource) -> Result<String, EncodeError> {
    let encoded = match source {
        ByteSource::Path(path) => {
            let bytes = tokio::fs::read(path).await.map_err(|e| EncodeError::Read {
                location: path.display().to_string(),
                source: e,
            })?;
            encode_base64(&bytes)
        }
        ByteSource::Memory(bytes) => encode_base64(bytes),
    };

    Ok(strip_data_url_prefix(&encoded).to_string())
}
