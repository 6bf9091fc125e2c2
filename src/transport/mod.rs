//! Transport module - TCP connection handling.
//!
//! Provides a blocking [`Connection`] that maps every low-level failure to
//! [`SenderError::Network`](crate::error::SenderError::Network).

mod tcp;

pub use tcp::Connection;
