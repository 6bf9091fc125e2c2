//! Frame struct and frame construction.
//!
//! A frame is a 13-byte header followed directly by a UTF-8 JSON body.
//! Uses `bytes::Bytes` so a received reply can be split into header and
//! body without copying.
//!
//! # Example
//!
//! ```
//! use zabbix_sender::protocol::{build_frame, Frame, HEADER_SIZE};
//!
//! let bytes = build_frame(1, b"{}");
//! assert_eq!(bytes.len(), HEADER_SIZE + 2);
//!
//! let frame = Frame::split(bytes.into()).unwrap();
//! assert_eq!(frame.version(), 1);
//! assert_eq!(frame.body(), b"{}");
//! ```

use bytes::Bytes;

use super::wire_format::{starts_with_magic, Header, HEADER_SIZE};
use crate::codec::JsonCodec;
use crate::error::{Result, SenderError};
use crate::payload::Payload;

/// A complete protocol frame.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Decoded header.
    pub header: Header,
    /// Body bytes (zero-copy via `bytes::Bytes`).
    pub body: Bytes,
}

impl Frame {
    /// Create a new frame from header and body.
    pub fn new(header: Header, body: Bytes) -> Self {
        Self { header, body }
    }

    /// Split a raw reply into header and body.
    ///
    /// The body is everything after the 13-byte header; the declared length
    /// is reported but not used to slice, so trailing bytes stay in the body.
    ///
    /// # Errors
    ///
    /// - `invalid protocol header` if the first four bytes are not the magic.
    /// - `invalid json` if the reply ends inside the header, since there is
    ///   no body to decode.
    pub fn split(mut raw: Bytes) -> Result<Self> {
        if !starts_with_magic(&raw) {
            return Err(SenderError::protocol("invalid protocol header"));
        }
        let header = Header::decode(&raw).ok_or_else(|| {
            SenderError::protocol(format!(
                "invalid json: reply of {} bytes has no body",
                raw.len()
            ))
        })?;
        let body = raw.split_off(HEADER_SIZE);

        if header.length != body.len() as u64 {
            tracing::debug!(
                "Reply header declares {} body bytes, received {}",
                header.length,
                body.len()
            );
        }

        Ok(Self { header, body })
    }

    /// Get a reference to the body bytes.
    #[inline]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Get the body length.
    #[inline]
    pub fn body_len(&self) -> usize {
        self.body.len()
    }

    /// Get the protocol version byte.
    #[inline]
    pub fn version(&self) -> u8 {
        self.header.version
    }
}

/// Build a complete frame as a single byte vector.
///
/// The length field always equals `body.len()`.
pub fn build_frame(version: u8, body: &[u8]) -> Vec<u8> {
    let header = Header::new(version, body.len() as u64);
    let mut buf = Vec::with_capacity(HEADER_SIZE + body.len());
    buf.extend_from_slice(&header.encode());
    buf.extend_from_slice(body);
    buf
}

/// Serialize a payload and wrap it in a frame.
pub fn encode_request(payload: &Payload, version: u8) -> Result<Vec<u8>> {
    let body = JsonCodec::encode(payload)?;
    Ok(build_frame(version, &body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::DataPoint;
    use crate::protocol::MAGIC;

    fn header_of(bytes: &[u8]) -> Header {
        Header::decode(&bytes[..HEADER_SIZE]).unwrap()
    }

    #[test]
    fn test_build_frame_layout() {
        let bytes = build_frame(1, b"hello");
        assert_eq!(bytes.len(), HEADER_SIZE + 5);
        assert_eq!(&bytes[..4], &MAGIC);
        assert_eq!(bytes[4], 1);
        assert_eq!(header_of(&bytes).length, 5);
        assert_eq!(&bytes[HEADER_SIZE..], b"hello");
    }

    #[test]
    fn test_build_frame_custom_version() {
        let bytes = build_frame(3, b"{}");
        assert_eq!(header_of(&bytes).version, 3);
    }

    #[test]
    fn test_encode_request_length_matches_body() {
        for n in [0usize, 1, 7, 100] {
            let mut payload = Payload::new();
            for i in 0..n {
                payload.push(DataPoint::new("host", format!("key{i}"), i as i64));
            }
            let bytes = encode_request(&payload, 1).unwrap();
            let header = header_of(&bytes);

            assert!(header.has_valid_magic());
            assert_eq!(header.version, 1);
            assert_eq!(header.length as usize, bytes.len() - HEADER_SIZE);

            let body: serde_json::Value =
                serde_json::from_slice(&bytes[HEADER_SIZE..]).unwrap();
            assert_eq!(body["data"].as_array().unwrap().len(), n);
        }
    }

    #[test]
    fn test_encode_empty_request() {
        let bytes = encode_request(&Payload::new(), 1).unwrap();
        assert_eq!(
            &bytes[HEADER_SIZE..],
            br#"{"request":"sender data","data":[]}"#
        );
    }

    #[test]
    fn test_split_roundtrip() {
        let bytes = build_frame(1, br#"{"response":"success"}"#);
        let frame = Frame::split(Bytes::from(bytes)).unwrap();
        assert_eq!(frame.version(), 1);
        assert_eq!(frame.body(), br#"{"response":"success"}"#);
        assert_eq!(frame.header.length as usize, frame.body_len());
    }

    #[test]
    fn test_split_rejects_bad_magic() {
        let mut bytes = build_frame(1, b"{}");
        bytes[0] = b'X';
        let err = Frame::split(Bytes::from(bytes)).unwrap_err();
        assert!(err.is_protocol());
        assert!(err.to_string().contains("invalid protocol header"));
    }

    #[test]
    fn test_split_rejects_empty_reply() {
        let err = Frame::split(Bytes::new()).unwrap_err();
        assert!(err.to_string().contains("invalid protocol header"));
    }

    #[test]
    fn test_split_truncated_header() {
        let err = Frame::split(Bytes::from_static(b"ZBXD\x01\x02")).unwrap_err();
        assert!(err.is_protocol());
        assert!(err.to_string().contains("invalid json"));
    }

    #[test]
    fn test_split_ignores_declared_length() {
        let mut bytes = Header::new(1, 2).encode().to_vec();
        bytes.extend_from_slice(b"{}   ");
        let frame = Frame::split(Bytes::from(bytes)).unwrap();
        assert_eq!(frame.body(), b"{}   ");
    }
}
