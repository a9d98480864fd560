//! Runtime error types.

use thiserror::Error;

use bradl_core::TransportError;
use bradl_framework::RegistryError;

use crate::config::ConfigError;

/// Fatal errors raised while starting or running the bot.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Connecting or logging in failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The command set could not be assembled.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The builder was not given a transport.
    #[error("no transport configured")]
    MissingTransport,

    /// The runtime was started twice.
    #[error("runtime is already running")]
    AlreadyRunning,
}

impl RuntimeError {
    /// `<kind>` part of the startup failure line.
    pub fn kind(&self) -> String {
        match self {
            Self::Config(e) => format!("ConfigError::{}", e.kind()),
            Self::Transport(e) => format!("TransportError::{}", e.kind()),
            Self::Registry(_) => "RegistryError::DuplicateCommand".to_string(),
            Self::MissingTransport => "RuntimeError::MissingTransport".to_string(),
            Self::AlreadyRunning => "RuntimeError::AlreadyRunning".to_string(),
        }
    }
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_the_source() {
        let err = RuntimeError::from(ConfigError::validation("token must not be empty"));
        assert_eq!(err.kind(), "ConfigError::Validation");
        assert_eq!(err.to_string(), "Invalid configuration: token must not be empty");

        let err = RuntimeError::from(TransportError::Unauthorized("bad token".into()));
        assert_eq!(err.kind(), "TransportError::Unauthorized");
    }
}
