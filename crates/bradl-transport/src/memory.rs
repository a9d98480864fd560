//! In-process transport.
//!
//! [`MemoryTransport`] is fed through a [`MemoryHandle`] and records every
//! outbound action instead of performing it. The event stream ends once
//! every handle has been dropped or [`disconnect`](Transport::disconnect)
//! is called.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use futures::{StreamExt, stream};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use bradl_core::{
    Channel, ChannelId, Guild, GuildId, Member, MessageEvent, MessageId, OutgoingMessage, Session,
    Transport, TransportError, TransportEvent, TransportResult, User, UserId,
};

/// An outbound action performed through a [`MemoryTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Sent {
        channel: ChannelId,
        message: OutgoingMessage,
    },
    Kicked {
        guild: GuildId,
        user: UserId,
        reason: Option<String>,
    },
    Banned {
        guild: GuildId,
        user: UserId,
        delete_message_days: u8,
        reason: Option<String>,
    },
    Unbanned {
        guild: GuildId,
        user: UserId,
    },
    Deleted {
        channel: ChannelId,
        count: usize,
    },
}

/// Pushes inbound events into a [`MemoryTransport`] session.
#[derive(Debug, Clone)]
pub struct MemoryHandle {
    sender: mpsc::UnboundedSender<TransportEvent>,
    next_id: Arc<AtomicU64>,
}

impl MemoryHandle {
    /// Queues an event. Returns `false` once the session is gone.
    pub fn push(&self, event: TransportEvent) -> bool {
        self.sender.send(event).is_ok()
    }

    pub fn guild_available(&self, guild: Guild) -> bool {
        self.push(TransportEvent::GuildAvailable(guild))
    }

    pub fn error(&self, error: TransportError) -> bool {
        self.push(TransportEvent::Error(error))
    }

    /// Queues a text message with a fresh message id.
    pub fn message(
        &self,
        channel: Channel,
        guild: Option<Guild>,
        author: Member,
        content: impl Into<String>,
    ) -> bool {
        let id = MessageId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.push(TransportEvent::Message(MessageEvent {
            id,
            channel,
            guild,
            author,
            content: content.into(),
        }))
    }
}

/// A transport that lives entirely in memory.
pub struct MemoryTransport {
    user: User,
    token: Option<String>,
    events: Mutex<Option<mpsc::UnboundedReceiver<TransportEvent>>>,
    actions: Mutex<Vec<Action>>,
    closed: CancellationToken,
    next_id: Arc<AtomicU64>,
}

impl MemoryTransport {
    /// Creates a transport logged in as `user`, plus the handle that feeds it.
    pub fn new(user: User) -> (Self, MemoryHandle) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let next_id = Arc::new(AtomicU64::new(1));
        let transport = Self {
            user,
            token: None,
            events: Mutex::new(Some(receiver)),
            actions: Mutex::new(Vec::new()),
            closed: CancellationToken::new(),
            next_id: next_id.clone(),
        };
        (transport, MemoryHandle { sender, next_id })
    }

    /// Requires `connect` to be called with exactly `token`.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Every action performed so far, in order.
    pub fn actions(&self) -> Vec<Action> {
        self.actions.lock().clone()
    }

    /// Messages sent so far, in order.
    pub fn sent(&self) -> Vec<(ChannelId, OutgoingMessage)> {
        self.actions
            .lock()
            .iter()
            .filter_map(|action| match action {
                Action::Sent { channel, message } => Some((*channel, message.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }

    fn record(&self, action: Action) {
        trace!(?action, "Recorded action");
        self.actions.lock().push(action);
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn connect(&self, token: &str) -> TransportResult<Session> {
        if token.is_empty() {
            return Err(TransportError::Unauthorized("empty token".into()));
        }
        if self.token.as_deref().is_some_and(|expected| expected != token) {
            return Err(TransportError::Unauthorized("invalid token".into()));
        }

        let receiver =
            self.events
                .lock()
                .take()
                .ok_or_else(|| TransportError::ConnectionFailed {
                    reason: "session already established".into(),
                })?;

        debug!(user = %self.user.name, "Memory session established");

        let ready = TransportEvent::Ready {
            user: self.user.clone(),
        };
        let remaining = stream::unfold(
            (receiver, self.closed.clone()),
            |(mut receiver, closed)| async move {
                tokio::select! {
                    biased;
                    _ = closed.cancelled() => None,
                    event = receiver.recv() => event.map(|event| (event, (receiver, closed))),
                }
            },
        );
        let events = stream::once(async move { ready }).chain(remaining).boxed();

        Ok(Session {
            user: self.user.clone(),
            events,
        })
    }

    async fn send(
        &self,
        channel: ChannelId,
        message: OutgoingMessage,
    ) -> TransportResult<MessageId> {
        if self.closed.is_cancelled() {
            return Err(TransportError::ConnectionClosed {
                reason: "session disconnected".into(),
            });
        }
        let id = MessageId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.record(Action::Sent { channel, message });
        Ok(id)
    }

    async fn kick(&self, guild: GuildId, user: UserId, reason: Option<&str>) -> TransportResult<()> {
        self.record(Action::Kicked {
            guild,
            user,
            reason: reason.map(str::to_string),
        });
        Ok(())
    }

    async fn ban(
        &self,
        guild: GuildId,
        user: UserId,
        delete_message_days: u8,
        reason: Option<&str>,
    ) -> TransportResult<()> {
        self.record(Action::Banned {
            guild,
            user,
            delete_message_days,
            reason: reason.map(str::to_string),
        });
        Ok(())
    }

    async fn unban(&self, guild: GuildId, user: UserId) -> TransportResult<()> {
        self.record(Action::Unbanned { guild, user });
        Ok(())
    }

    async fn delete_messages(&self, channel: ChannelId, count: usize) -> TransportResult<usize> {
        self.record(Action::Deleted { channel, count });
        Ok(count)
    }

    async fn disconnect(&self) -> TransportResult<()> {
        self.closed.cancel();
        debug!("Memory session closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport() -> (MemoryTransport, MemoryHandle) {
        MemoryTransport::new(User::new(1, "BradlBot"))
    }

    #[tokio::test]
    async fn test_ready_comes_first() {
        let (transport, handle) = transport();
        handle.guild_available(Guild::new(5, "guild"));
        let mut session = transport.connect("token").await.unwrap();
        assert_eq!(session.user.name, "BradlBot");

        assert!(matches!(
            session.events.next().await,
            Some(TransportEvent::Ready { user }) if user.id == UserId(1)
        ));
        assert!(matches!(
            session.events.next().await,
            Some(TransportEvent::GuildAvailable(g)) if g.name == "guild"
        ));
    }

    #[tokio::test]
    async fn test_stream_ends_when_handles_drop() {
        let (transport, handle) = transport();
        handle.message(
            Channel::new(2, "general"),
            None,
            Member::new(User::new(3, "alice")),
            "!ping",
        );
        drop(handle);

        let session = transport.connect("token").await.unwrap();
        let events: Vec<_> = session.events.collect().await;
        assert_eq!(events.len(), 2);
        assert!(matches!(&events[1], TransportEvent::Message(m) if m.content == "!ping"));
    }

    #[tokio::test]
    async fn test_disconnect_ends_stream() {
        let (transport, _handle) = transport();
        let mut session = transport.connect("token").await.unwrap();
        assert!(session.events.next().await.is_some());

        transport.disconnect().await.unwrap();
        assert!(transport.is_closed());
        assert!(session.events.next().await.is_none());
        assert!(matches!(
            transport.send(ChannelId(2), "late".into()).await,
            Err(TransportError::ConnectionClosed { .. })
        ));
    }

    #[tokio::test]
    async fn test_connect_rejects_bad_tokens() {
        let (transport, _handle) = transport();
        let transport = transport.with_token("secret");
        assert!(matches!(
            transport.connect("").await,
            Err(TransportError::Unauthorized(_))
        ));
        assert!(matches!(
            transport.connect("wrong").await,
            Err(TransportError::Unauthorized(_))
        ));
        assert!(transport.connect("secret").await.is_ok());
        assert!(matches!(
            transport.connect("secret").await,
            Err(TransportError::ConnectionFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_actions_are_recorded_in_order() {
        let (transport, _handle) = transport();
        let first = transport.send(ChannelId(2), "hi".into()).await.unwrap();
        transport
            .kick(GuildId(5), UserId(9), Some("spam"))
            .await
            .unwrap();
        transport.ban(GuildId(5), UserId(9), 1, None).await.unwrap();
        transport.unban(GuildId(5), UserId(9)).await.unwrap();
        assert_eq!(transport.delete_messages(ChannelId(2), 4).await.unwrap(), 4);
        let second = transport.send(ChannelId(2), "bye".into()).await.unwrap();
        assert_ne!(first, second);

        let actions = transport.actions();
        assert_eq!(actions.len(), 6);
        assert_eq!(
            actions[1],
            Action::Kicked {
                guild: GuildId(5),
                user: UserId(9),
                reason: Some("spam".into())
            }
        );
        assert_eq!(transport.sent().len(), 2);
    }
}
