//! The transport session capability.
//!
//! A [`Transport`] owns the persistent connection to the messaging service.
//! The core only ever does two things with it: consume the event stream
//! returned by [`connect`](Transport::connect), and ask it to perform
//! outbound actions (sending, moderation).

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::{TransportError, TransportResult};
use crate::event::TransportEvent;
use crate::id::{ChannelId, GuildId, MessageId, UserId};
use crate::message::OutgoingMessage;
use crate::model::User;

/// A lazy, ordered stream of inbound events.
pub type EventStream = BoxStream<'static, TransportEvent>;

/// An established session: the bot's own identity plus its event stream.
pub struct Session {
    /// The account the session is logged in as.
    pub user: User,
    /// Inbound events, in delivery order. The stream ends when the session
    /// is closed for good.
    pub events: EventStream,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

/// A connection to the messaging gateway.
///
/// Only [`connect`](Self::connect) and [`send`](Self::send) are mandatory.
/// Moderation capabilities default to [`TransportError::Unsupported`].
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Short name of the transport, used in logs.
    fn name(&self) -> &'static str;

    /// Connects and logs in with `token`.
    ///
    /// May only be called once per transport instance.
    async fn connect(&self, token: &str) -> TransportResult<Session>;

    /// Sends a message to `channel` and returns the new message's id.
    async fn send(&self, channel: ChannelId, message: OutgoingMessage)
    -> TransportResult<MessageId>;

    /// Removes `user` from `guild`.
    async fn kick(
        &self,
        _guild: GuildId,
        _user: UserId,
        _reason: Option<&str>,
    ) -> TransportResult<()> {
        Err(TransportError::unsupported("kick"))
    }

    /// Bans `user` from `guild`, deleting up to `delete_message_days` of history.
    async fn ban(
        &self,
        _guild: GuildId,
        _user: UserId,
        _delete_message_days: u8,
        _reason: Option<&str>,
    ) -> TransportResult<()> {
        Err(TransportError::unsupported("ban"))
    }

    /// Lifts a ban.
    async fn unban(&self, _guild: GuildId, _user: UserId) -> TransportResult<()> {
        Err(TransportError::unsupported("unban"))
    }

    /// Deletes the most recent `count` messages in `channel` and returns how
    /// many were actually removed.
    async fn delete_messages(&self, _channel: ChannelId, _count: usize) -> TransportResult<usize> {
        Err(TransportError::unsupported("delete_messages"))
    }

    /// Closes the session. The event stream ends afterwards.
    async fn disconnect(&self) -> TransportResult<()> {
        Ok(())
    }
}

/// A shared transport trait object.
pub type BoxedTransport = Arc<dyn Transport>;
