//! Transport-level error types.

use thiserror::Error;

/// Errors raised by a [`Transport`](crate::Transport) implementation.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Connecting or logging in failed.
    #[error("connection failed: {reason}")]
    ConnectionFailed {
        /// Reason for failure.
        reason: String,
    },

    /// Connection closed.
    #[error("connection closed: {reason}")]
    ConnectionClosed {
        /// Reason for closure.
        reason: String,
    },

    /// The token was rejected by the gateway.
    #[error("authentication rejected: {0}")]
    Unauthorized(String),

    /// Message send failed.
    #[error("failed to send message: {0}")]
    SendFailed(String),

    /// The gateway refused the action for lack of permissions.
    #[error("missing permissions: {0}")]
    Forbidden(String),

    /// The transport does not implement the requested capability.
    #[error("operation '{operation}' is not supported by this transport")]
    Unsupported {
        /// The operation name.
        operation: &'static str,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(String),
}

impl TransportError {
    /// Creates an [`Unsupported`](Self::Unsupported) error for `operation`.
    pub fn unsupported(operation: &'static str) -> Self {
        Self::Unsupported { operation }
    }

    /// Short, stable name of the variant, used when a failure is reported to users.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConnectionFailed { .. } => "ConnectionFailed",
            Self::ConnectionClosed { .. } => "ConnectionClosed",
            Self::Unauthorized(_) => "Unauthorized",
            Self::SendFailed(_) => "SendFailed",
            Self::Forbidden(_) => "Forbidden",
            Self::Unsupported { .. } => "Unsupported",
            Self::Io(_) => "Io",
        }
    }
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_display() {
        let err = TransportError::unsupported("ban");
        assert_eq!(
            err.to_string(),
            "operation 'ban' is not supported by this transport"
        );
        assert_eq!(err.kind(), "Unsupported");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: TransportError = io.into();
        assert!(matches!(err, TransportError::Io(ref m) if m == "pipe closed"));
    }
}
