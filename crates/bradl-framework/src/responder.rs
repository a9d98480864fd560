//! Error classifier and responder.
//!
//! [`classify`] is a pure mapping from a non-success [`Outcome`] to the
//! embed the user sees. The [`Responder`] sends that embed and swallows
//! (logs) any send failure.

use bradl_core::{BoxedTransport, ChannelId, Color, Embed, emoji};
use tracing::{debug, warn};

use crate::outcome::Outcome;

pub const ACCESS_DENIED_TITLE: &str = "Access Denied";
pub const ERROR_TITLE: &str = "Error";
/// Shown in the help hint when the failing command is not known.
pub const COMMAND_PLACEHOLDER: &str = "<Command Name>";

/// Maps an outcome to its response embed.
///
/// Returns `None` for `Success` and `NotACommand`, which never get a reply.
pub fn classify(outcome: &Outcome, prefix: &str) -> Option<Embed> {
    match outcome {
        Outcome::Success { .. } | Outcome::NotACommand => None,
        Outcome::PreconditionFailed { .. } => Some(
            Embed::new(
                ACCESS_DENIED_TITLE,
                format!(
                    "{} You do not have permission to execute this.",
                    emoji::glyph_or_name(":no_entry:")
                ),
            )
            .color(Color::RED),
        ),
        Outcome::ArgumentError { command, .. } => Some(
            Embed::new(
                ERROR_TITLE,
                format!(
                    "{} Incorrect arguments; see '{prefix}help {}'",
                    emoji::glyph_or_name(":face_palm:"),
                    command.as_deref().unwrap_or(COMMAND_PLACEHOLDER)
                ),
            )
            .color(Color::RED),
        ),
        Outcome::HandlerFault { kind, message, .. } => {
            Some(Embed::new(ERROR_TITLE, format!("{kind} - {message}")).color(Color::RED))
        }
    }
}

/// Sends exactly one formatted response per failed invocation.
#[derive(Debug, Clone)]
pub struct Responder {
    prefix: String,
}

impl Responder {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Sends the response for `outcome` to `channel`.
    ///
    /// Never fails: send errors are logged and dropped.
    pub async fn respond(&self, transport: &BoxedTransport, channel: ChannelId, outcome: &Outcome) {
        let Some(embed) = classify(outcome, &self.prefix) else {
            return;
        };

        match transport.send(channel, embed.into()).await {
            Ok(id) => debug!(%channel, message_id = %id, outcome = outcome.kind(), "Sent failure response"),
            Err(e) => warn!(%channel, error = %e, outcome = outcome.kind(), "Failed to send failure response"),
        }
    }
}
