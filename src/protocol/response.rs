//! Decoding of the server reply.
//!
//! Steps: check the magic, cut the 13-byte header, decode the JSON body into
//! a map, read `response` and `info`, then tokenize `info` into counters.

use bytes::Bytes;
use serde_json::{Map, Value};

use super::frame::Frame;
use super::info::{parse_info, ProcessingInfo};
use super::wire_format::Header;
use crate::codec::JsonCodec;
use crate::error::{Result, SenderError};

/// Status reported in the `response` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    /// `"success"`: the batch was accepted.
    Success,
    /// Anything else (normally `"failed"`): the server rejected the request.
    Failed,
}

impl ResponseStatus {
    fn from_field(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str) {
            Some("success") => ResponseStatus::Success,
            _ => ResponseStatus::Failed,
        }
    }

    /// Check if the server accepted the batch.
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, ResponseStatus::Success)
    }
}

/// A decoded server reply.
#[derive(Debug, Clone)]
pub struct Response {
    /// Reply header.
    pub header: Header,
    /// Value of the `response` field.
    pub status: ResponseStatus,
    /// Value of the `info` field, if present and a string.
    pub info: Option<String>,
    /// Counters tokenized from `info`.
    pub counts: Option<ProcessingInfo>,
    /// The full decoded body.
    pub body: Map<String, Value>,
    /// The reply exactly as received.
    pub raw: Bytes,
}

impl Response {
    /// Check if the server accepted the batch.
    #[inline]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Parse a raw reply.
///
/// # Errors
///
/// Returns a protocol error if the magic is wrong or the body is not a JSON
/// object. An `info` text in an unexpected shape is not an error; its
/// counters read as 0.
///
/// # Example
///
/// ```
/// use zabbix_sender::protocol::{build_frame, parse_response, ResponseStatus};
///
/// let body = br#"{"response":"success","info":"Processed 1 Failed 0 Total 1 Seconds spent 0.01"}"#;
/// let response = parse_response(build_frame(1, body).into()).unwrap();
/// assert_eq!(response.status, ResponseStatus::Success);
/// assert_eq!(response.counts.unwrap().processed, 1);
/// ```
pub fn parse_response(raw: Bytes) -> Result<Response> {
    let frame = Frame::split(raw.clone())?;
    let body: Value = JsonCodec::decode(frame.body())?;
    let Value::Object(body) = body else {
        return Err(SenderError::protocol(
            "invalid json: reply body is not an object",
        ));
    };

    let status = ResponseStatus::from_field(body.get("response"));
    let info = body.get("info").and_then(Value::as_str).map(str::to_string);
    let counts = info.as_deref().map(parse_info);

    Ok(Response {
        header: frame.header,
        status,
        info,
        counts,
        body,
        raw,
    })
}
