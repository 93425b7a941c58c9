//! Base64 helpers for inline image payloads.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::CoreError;

/// Encode raw bytes as standard (padded) base64.
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode a standard base64 payload, tolerating a `data:` URL prefix.
pub fn decode_base64(payload: &str) -> Result<Vec<u8>, CoreError> {
    Ok(STANDARD.decode(strip_data_url_prefix(payload).trim())?)
}

/// Strip a `data:<mime>;base64,` declaration, leaving only the payload.
///
/// Text without a `data:` prefix is returned unchanged.
pub fn strip_data_url_prefix(text: &str) -> &str {
    if !text.starts_with("data:") {
        return text;
    }
    match text.find(',') {
        Some(comma) => &text[comma + 1..],
        None => text,
    }
}
