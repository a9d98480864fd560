//! Inbound events.
//!
//! A transport session exposes a single stream of [`TransportEvent`]s. The
//! runtime consumes that stream and dispatches by tag, so nothing in the core
//! depends on a callback-registration mechanism.

use crate::error::TransportError;
use crate::id::MessageId;
use crate::model::{Channel, Guild, Member, User};

/// A text message delivered by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEvent {
    pub id: MessageId,
    pub channel: Channel,
    /// `None` for direct messages.
    pub guild: Option<Guild>,
    pub author: Member,
    pub content: String,
}

impl MessageEvent {
    /// Returns the author's user record.
    pub fn user(&self) -> &User {
        &self.author.user
    }

    /// Returns `true` if the message was sent in a direct-message channel.
    pub fn is_direct(&self) -> bool {
        self.guild.is_none()
    }

    /// Name of the originating guild, or `"DM"`; used in log lines.
    pub fn guild_name(&self) -> &str {
        self.guild.as_ref().map_or("DM", |g| g.name.as_str())
    }
}

/// Tagged events emitted by a transport session.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// The session finished its handshake and is ready to process events.
    Ready {
        /// The bot's own account.
        user: User,
    },
    /// A guild became available to the session.
    GuildAvailable(Guild),
    /// A transport-level error. The transport's own reconnection policy
    /// decides what happens next.
    Error(TransportError),
    /// A text message was created.
    Message(MessageEvent),
}

impl TransportEvent {
    /// Short tag name, used for tracing spans.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ready { .. } => "ready",
            Self::GuildAvailable(_) => "guild_available",
            Self::Error(_) => "error",
            Self::Message(_) => "message",
        }
    }
}
