//! The tagged result of one dispatch.

/// Exactly one `Outcome` is produced for every message that reaches the
/// dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The handler ran to completion; it is responsible for its own reply.
    Success {
        command: String,
    },
    /// The invoking user lacks the required capability.
    PreconditionFailed {
        command: String,
        reason: String,
    },
    /// The arguments had the wrong shape, or the command token was unknown
    /// (`command` is `None` then).
    ArgumentError {
        command: Option<String>,
        detail: String,
    },
    /// The handler failed, panicked or ran out of time.
    HandlerFault {
        command: String,
        kind: String,
        message: String,
    },
    /// Not a command invocation. No side effects were performed.
    NotACommand,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// `true` for outcomes the responder must answer.
    pub fn is_failure(&self) -> bool {
        !matches!(self, Self::Success { .. } | Self::NotACommand)
    }

    /// The qualified command name, when one was resolved.
    pub fn command(&self) -> Option<&str> {
        match self {
            Self::Success { command }
            | Self::PreconditionFailed { command, .. }
            | Self::HandlerFault { command, .. } => Some(command),
            Self::ArgumentError { command, .. } => command.as_deref(),
            Self::NotACommand => None,
        }
    }

    /// Short tag, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::PreconditionFailed { .. } => "precondition_failed",
            Self::ArgumentError { .. } => "argument_error",
            Self::HandlerFault { .. } => "handler_fault",
            Self::NotACommand => "not_a_command",
        }
    }
}
