//! Protocol module - wire format, framing, and reply decoding.
//!
//! This module implements the trapper protocol:
//! - 13-byte header encoding/decoding
//! - Frame construction for `"sender data"` requests
//! - Reply parsing, including the positional `info` tokenizer

mod frame;
mod info;
mod response;
mod wire_format;

pub use frame::{build_frame, encode_request, Frame};
pub use info::{parse_info, ProcessingInfo};
pub use response::{parse_response, Response, ResponseStatus};
pub use wire_format::{
    starts_with_magic, Header, DEFAULT_PROTOCOL_VERSION, HEADER_SIZE, MAGIC,
};
