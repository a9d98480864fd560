//! Error types for the command framework.

use bradl_core::TransportError;
use thiserror::Error;

/// Raised when a registration would break name/alias uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// `name` is already registered as a command name or alias.
    #[error("duplicate command: '{name}' is already registered")]
    DuplicateCommand {
        /// The colliding name or alias.
        name: String,
    },
}

/// A failure raised by a command handler.
///
/// The dispatcher turns [`Arguments`](Self::Arguments) into an
/// `ArgumentError` outcome and [`Fault`](Self::Fault) into a `HandlerFault`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The arguments did not have the shape the command expects.
    #[error("invalid arguments: {detail}")]
    Arguments {
        /// Human-readable description of what was wrong.
        detail: String,
    },

    /// Any other failure.
    #[error("{kind} - {message}")]
    Fault {
        /// Short classification of the failure.
        kind: String,
        /// The failure's description.
        message: String,
    },
}

impl CommandError {
    /// Creates an argument-shape error.
    pub fn arguments(detail: impl Into<String>) -> Self {
        Self::Arguments {
            detail: detail.into(),
        }
    }

    /// Creates a fault with an explicit kind.
    pub fn fault(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fault {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Wraps an arbitrary error as a fault, using its short type name as the kind.
    pub fn from_error<E: std::error::Error + 'static>(err: E) -> Self {
        Self::fault(short_type_name::<E>(), err.to_string())
    }
}

impl From<TransportError> for CommandError {
    fn from(err: TransportError) -> Self {
        Self::fault(err.kind(), err.to_string())
    }
}

impl From<std::num::ParseIntError> for CommandError {
    fn from(err: std::num::ParseIntError) -> Self {
        Self::arguments(err.to_string())
    }
}

/// Result type returned by command handlers.
pub type CommandResult<T = ()> = Result<T, CommandError>;

/// Last path segment of `T`'s type name with generics stripped.
fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_error_uses_short_type_name() {
        let io = std::io::Error::other("disk on fire");
        let err = CommandError::from_error(io);
        assert_eq!(err, CommandError::fault("Error", "disk on fire"));
    }

    #[test]
    fn test_transport_error_becomes_fault() {
        let err: CommandError = TransportError::Forbidden("ban members".into()).into();
        assert_eq!(
            err,
            CommandError::fault("Forbidden", "missing permissions: ban members")
        );
    }

    #[test]
    fn test_parse_int_is_argument_error() {
        let err: CommandError = "x".parse::<u32>().unwrap_err().into();
        assert!(matches!(err, CommandError::Arguments { .. }));
    }

    #[test]
    fn test_fault_display() {
        let err = CommandError::fault("Timeout", "too slow");
        assert_eq!(err.to_string(), "Timeout - too slow");
    }
}
