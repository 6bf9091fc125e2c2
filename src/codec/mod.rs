//! Codec module - body serialization and text normalization.
//!
//! - [`JsonCodec`] - JSON bodies for requests and replies (`serde_json`)
//! - [`normalize_text`] - coerce byte strings to valid UTF-8
//!
//! # Example
//!
//! ```
//! use zabbix_sender::codec::{normalize_text, JsonCodec};
//!
//! let encoded = JsonCodec::encode(&"hello").unwrap();
//! let decoded: String = JsonCodec::decode(&encoded).unwrap();
//! assert_eq!(decoded, "hello");
//!
//! assert_eq!(normalize_text(b"\xe9t\xe9"), "été");
//! ```

mod json;
mod text;

pub use json::JsonCodec;
pub use text::normalize_text;
