//! JSON encoding of API values.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Encode a value as JSON bytes.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, CodecError> {
    Ok(serde_json::to_vec(value)?)
}

/// Decode a value from JSON bytes.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    if bytes.is_empty() {
        return Err(CodecError::EmptyInput);
    }
    Ok(serde_json::from_slice(bytes)?)
}

/// Error encoding or decoding an API value.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("cannot decode from empty input")]
    EmptyInput,
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}
