//! Text normalization for outgoing values.
//!
//! Byte strings that are already UTF-8 pass through untouched. Anything else
//! is read as ISO-8859-1, where every byte maps to the code point of the
//! same value, so the result is always valid UTF-8.

use std::borrow::Cow;

/// Coerce a byte string to valid UTF-8.
///
/// Borrows when the input is already UTF-8.
pub fn normalize_text(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(s) => Cow::Borrowed(s),
        Err(_) => Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect()),
    }
}
