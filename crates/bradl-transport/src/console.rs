//! Stdin/stdout transport for running the bot locally.
//!
//! Every input line becomes a message from a single operator in a single
//! `console` guild. The operator holds the `moderator` and `owner` roles so
//! every command tier can be exercised. Outbound messages and moderation
//! actions are written to the output as plain text.

use std::io;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use futures::{StreamExt, stream};
use parking_lot::Mutex;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, warn};

use bradl_core::{
    Channel, ChannelId, Guild, GuildId, Member, MessageEvent, MessageId, OutgoingMessage, Role,
    Session, Transport, TransportError, TransportEvent, TransportResult, User, UserId,
};

type Input = Box<dyn AsyncBufRead + Send + Unpin>;
type Output = Box<dyn AsyncWrite + Send + Unpin>;

const BOT_ID: u64 = 1;
const OPERATOR_ID: u64 = 2;
const CONSOLE_ID: u64 = 1;

/// A transport backed by line-oriented I/O.
pub struct ConsoleTransport {
    input: Mutex<Option<Input>>,
    output: tokio::sync::Mutex<Output>,
    next_id: AtomicU64,
}

impl ConsoleTransport {
    /// Reads from stdin and writes to stdout.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }

    pub fn new(
        input: impl AsyncBufRead + Send + Unpin + 'static,
        output: impl AsyncWrite + Send + Unpin + 'static,
    ) -> Self {
        Self {
            input: Mutex::new(Some(Box::new(input))),
            output: tokio::sync::Mutex::new(Box::new(output)),
            next_id: AtomicU64::new(1),
        }
    }

    /// The bot's account in a console session.
    pub fn bot_user() -> User {
        User {
            bot: true,
            ..User::new(BOT_ID, "BradlBot")
        }
    }

    /// The local operator who authors every input line.
    pub fn operator() -> Member {
        Member::new(User::new(OPERATOR_ID, "operator"))
            .with_role(Role::new(1, "moderator"))
            .with_role(Role::new(2, "owner"))
    }

    pub fn guild() -> Guild {
        Guild::new(CONSOLE_ID, "console")
    }

    pub fn channel() -> Channel {
        Channel::new(CONSOLE_ID, "console")
    }

    async fn write_line(&self, line: &str) -> TransportResult<()> {
        let mut output = self.output.lock().await;
        output.write_all(line.as_bytes()).await?;
        output.write_all(b"\n").await?;
        output.flush().await?;
        Ok(())
    }
}

impl std::fmt::Debug for ConsoleTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleTransport").finish_non_exhaustive()
    }
}

#[async_trait]
impl Transport for ConsoleTransport {
    fn name(&self) -> &'static str {
        "console"
    }

    async fn connect(&self, _token: &str) -> TransportResult<Session> {
        let input = self
            .input
            .lock()
            .take()
            .ok_or_else(|| TransportError::ConnectionFailed {
                reason: "console input already attached".into(),
            })?;

        debug!("Console session attached");

        let user = Self::bot_user();
        let greeting = stream::iter([
            TransportEvent::Ready { user: user.clone() },
            TransportEvent::GuildAvailable(Self::guild()),
        ]);

        let lines = stream::unfold(Some((input, 1u64)), |state| async move {
            let (mut input, id) = state?;
            loop {
                let mut buf = Vec::new();
                match input.read_until(b'\n', &mut buf).await {
                    Ok(0) => return None,
                    Ok(_) => {}
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => {
                        // The reader is unusable after a hard I/O error.
                        warn!(error = %e, "Console input failed");
                        return Some((TransportEvent::Error(e.into()), None));
                    }
                }

                let line = match String::from_utf8(buf) {
                    Ok(line) => line,
                    Err(e) => {
                        warn!(error = %e, "Skipping console line that is not valid UTF-8");
                        let event = TransportEvent::Error(TransportError::Io(e.to_string()));
                        return Some((event, Some((input, id))));
                    }
                };
                let line = line.trim_end_matches(['\n', '\r']);
                if line.trim().is_empty() {
                    continue;
                }

                let event = TransportEvent::Message(MessageEvent {
                    id: MessageId(id),
                    channel: Self::channel(),
                    guild: Some(Self::guild()),
                    author: Self::operator(),
                    content: line.to_string(),
                });
                return Some((event, Some((input, id + 1))));
            }
        });

        Ok(Session {
            user,
            events: greeting.chain(lines).boxed(),
        })
    }

    async fn send(
        &self,
        _channel: ChannelId,
        message: OutgoingMessage,
    ) -> TransportResult<MessageId> {
        self.write_line(&message.to_string())
            .await
            .map_err(|e| TransportError::SendFailed(e.to_string()))?;
        Ok(MessageId(self.next_id.fetch_add(1, Ordering::Relaxed)))
    }

    async fn kick(&self, _guild: GuildId, user: UserId, reason: Option<&str>) -> TransportResult<()> {
        self.write_line(&format!(
            "* kicked {user}: {}",
            reason.unwrap_or("no reason given")
        ))
        .await
    }

    async fn ban(
        &self,
        _guild: GuildId,
        user: UserId,
        delete_message_days: u8,
        reason: Option<&str>,
    ) -> TransportResult<()> {
        self.write_line(&format!(
            "* banned {user} (deleting {delete_message_days} days): {}",
            reason.unwrap_or("no reason given")
        ))
        .await
    }

    async fn unban(&self, _guild: GuildId, user: UserId) -> TransportResult<()> {
        self.write_line(&format!("* unbanned {user}")).await
    }

    async fn delete_messages(&self, _channel: ChannelId, count: usize) -> TransportResult<usize> {
        // The console keeps no history.
        self.write_line(&format!("* purge of {count} messages ignored"))
            .await?;
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn test_lines_become_operator_messages() {
        let input: &'static [u8] = b"!ping\n\n  \n!say hello\n";
        let transport = ConsoleTransport::new(input, tokio::io::sink());
        let session = transport.connect("").await.unwrap();
        let events: Vec<_> = session.events.collect().await;

        assert_eq!(events.len(), 4);
        assert!(matches!(&events[0], TransportEvent::Ready { user } if user.bot));
        assert!(matches!(&events[1], TransportEvent::GuildAvailable(g) if g.name == "console"));
        match &events[3] {
            TransportEvent::Message(m) => {
                assert_eq!(m.content, "!say hello");
                assert_eq!(m.id, MessageId(2));
                assert!(m.author.has_role_named("owner"));
                assert_ne!(m.author.user.id, ConsoleTransport::bot_user().id);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_is_reported_and_skipped() {
        let input: &'static [u8] = b"!ping\n\xff\xfe bad\n!say after\r\n";
        let transport = ConsoleTransport::new(input, tokio::io::sink());
        let session = transport.connect("").await.unwrap();
        let events: Vec<_> = session.events.collect().await;

        assert_eq!(events.len(), 5);
        assert!(matches!(&events[2], TransportEvent::Message(m) if m.content == "!ping"));
        assert!(matches!(&events[3], TransportEvent::Error(TransportError::Io(_))));
        match &events[4] {
            TransportEvent::Message(m) => {
                assert_eq!(m.content, "!say after");
                assert_eq!(m.id, MessageId(2));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_second_connect_fails() {
        let input: &'static [u8] = b"";
        let transport = ConsoleTransport::new(input, tokio::io::sink());
        assert!(transport.connect("").await.is_ok());
        assert!(transport.connect("").await.is_err());
    }

    #[tokio::test]
    async fn test_send_writes_rendered_message() {
        let (writer, mut reader) = tokio::io::duplex(1024);
        let input: &'static [u8] = b"";
        let transport = ConsoleTransport::new(input, writer);

        transport
            .send(ConsoleTransport::channel().id, "Pong!".into())
            .await
            .unwrap();
        transport.kick(GuildId(1), UserId(7), None).await.unwrap();
        drop(transport);

        let mut written = String::new();
        reader.read_to_string(&mut written).await.unwrap();
        assert_eq!(written, "Pong!\n* kicked 7: no reason given\n");
    }
}
