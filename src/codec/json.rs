//! JSON codec using `serde_json`.
//!
//! Both directions fail with [`SenderError::Protocol`]: a body we cannot
//! encode or a reply we cannot decode is a framing problem, not an I/O one.

use crate::error::{Result, SenderError};

/// JSON codec for frame bodies.
pub struct JsonCodec;

impl JsonCodec {
    /// Encode a value to compact JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns a protocol error if the value cannot be serialized.
    #[inline]
    pub fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        serde_json::to_vec(value)
            .map_err(|e| SenderError::protocol(format!("cannot encode request: {e}")))
    }

    /// Decode JSON bytes to a value.
    ///
    /// # Errors
    ///
    /// Returns a protocol error (`invalid json`) if the bytes are not valid
    /// JSON for type T.
    #[inline]
    pub fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
        serde_json::from_slice(bytes).map_err(|e| SenderError::protocol(format!("invalid json: {e}")))
    }
}
