//! Sender payload: the `"sender data"` request and its data points.
//!
//! Serialized layout:
//! ```text
//! {"request":"sender data","data":[{"host":..,"key":..,"value":..,"clock":..}, ...]}
//! ```
//!
//! `clock` is omitted when not set. Insertion order of data points is kept.

use serde::Serialize;

use crate::codec::normalize_text;

/// Request name for trapper submissions.
pub const REQUEST_SENDER_DATA: &str = "sender data";

/// Value of a single data point.
///
/// Serialized untagged, so text goes out as a JSON string and numbers as
/// JSON numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Text value.
    Text(String),
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

/// Raw bytes are normalized to UTF-8 (see [`normalize_text`]).
impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Text(normalize_text(v).into_owned())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::from(v.as_slice())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v.into())
    }
}

/// One measurement queued for submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataPoint {
    /// Host name as configured on the server.
    pub host: String,
    /// Item key.
    pub key: String,
    /// Measured value.
    pub value: Value,
    /// Optional timestamp in epoch seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clock: Option<i64>,
}

impl DataPoint {
    /// Create a data point without a timestamp.
    pub fn new(host: impl Into<String>, key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            host: host.into(),
            key: key.into(),
            value: value.into(),
            clock: None,
        }
    }

    /// Attach a timestamp (epoch seconds).
    pub fn with_clock(mut self, clock: i64) -> Self {
        self.clock = Some(clock);
        self
    }
}

/// The `"sender data"` request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payload {
    request: &'static str,
    data: Vec<DataPoint>,
}

impl Payload {
    /// Create an empty payload.
    pub fn new() -> Self {
        Self {
            request: REQUEST_SENDER_DATA,
            data: Vec::new(),
        }
    }

    /// Append a data point.
    pub fn push(&mut self, point: DataPoint) {
        self.data.push(point);
    }

    /// Drop all queued data points.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Queued data points in insertion order.
    pub fn data(&self) -> &[DataPoint] {
        &self.data
    }

    /// Number of queued data points.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if no data points are queued.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Default for Payload {
    fn default() -> Self {
        Self::new()
    }
}
