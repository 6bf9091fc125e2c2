//! Error types for zabbix-sender.

use thiserror::Error;

/// Main error type for all sender operations.
///
/// A server answering `"failed"` is not an error; it is reported through
/// [`ResponseStatus::Failed`](crate::protocol::ResponseStatus::Failed).
#[derive(Debug, Error)]
pub enum SenderError {
    /// Connect, write or read failure on the TCP connection.
    #[error("Network error: {0}")]
    Network(#[from] std::io::Error),

    /// Reply is not a valid trapper frame (bad header, invalid JSON, etc.).
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl SenderError {
    /// Build a protocol error from any displayable message.
    pub(crate) fn protocol(msg: impl Into<String>) -> Self {
        SenderError::Protocol(msg.into())
    }

    /// Check if this is a network-level failure.
    pub fn is_network(&self) -> bool {
        matches!(self, SenderError::Network(_))
    }

    /// Check if this is a protocol-level failure.
    pub fn is_protocol(&self) -> bool {
        matches!(self, SenderError::Protocol(_))
    }
}

/// Result type alias using SenderError.
pub type Result<T> = std::result::Result<T, SenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_converts_to_network() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err: SenderError = io.into();
        assert!(err.is_network());
        assert!(!err.is_protocol());
        assert!(err.to_string().contains("refused"));
    }

    #[test]
    fn test_protocol_error_display() {
        let err = SenderError::protocol("invalid protocol header");
        assert!(err.is_protocol());
        assert_eq!(err.to_string(), "Protocol error: invalid protocol header");
    }
}
