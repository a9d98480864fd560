//! Application and execution contexts.
//!
//! - [`BotState`] is the **application** context: built once after the
//!   session is established and shared by every dispatch. It replaces any
//!   process-wide client object.
//! - [`CommandContext`] is the per-invocation **execution** context handed
//!   to a handler. It is created by the dispatcher for each matched command
//!   and dropped when the handler returns.

use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;

use bradl_core::{
    BoxedTransport, Channel, Color, Embed, Guild, Member, MessageEvent, MessageId,
    OutgoingMessage, User, UserId,
};

use crate::descriptor::CommandDescriptor;
use crate::error::CommandResult;
use crate::parse::parse_args;
use crate::registry::CommandRegistry;

/// What to do with a prefixed message whose command token is not registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownCommandPolicy {
    /// Treat it as ordinary chatter: no outcome beyond `NotACommand`, no reply.
    #[default]
    Ignore,
    /// Reply with the generic "incorrect arguments" response.
    Respond,
}

/// Dispatcher settings derived from configuration.
#[derive(Debug, Clone)]
pub struct DispatchOptions {
    /// Literal prefix that marks a command invocation.
    pub prefix: String,
    /// Whether `@bot command` is accepted as an invocation.
    pub mention_prefix: bool,
    /// The single bot-owner identity, if configured.
    pub owner: Option<UserId>,
    pub unknown_command: UnknownCommandPolicy,
    /// Execution budget for one handler invocation.
    pub handler_timeout: Duration,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            prefix: "!".to_string(),
            mention_prefix: true,
            owner: None,
            unknown_command: UnknownCommandPolicy::Ignore,
            handler_timeout: Duration::from_secs(30),
        }
    }
}

/// Shared application context.
pub struct BotState {
    options: DispatchOptions,
    registry: Arc<CommandRegistry>,
    transport: BoxedTransport,
    user: User,
    started_at: Instant,
    guilds: RwLock<Vec<Guild>>,
    shutdown: CancellationToken,
}

impl BotState {
    pub fn new(
        options: DispatchOptions,
        registry: Arc<CommandRegistry>,
        transport: BoxedTransport,
        user: User,
    ) -> Self {
        Self {
            options,
            registry,
            transport,
            user,
            started_at: Instant::now(),
            guilds: RwLock::new(Vec::new()),
            shutdown: CancellationToken::new(),
        }
    }

    /// Uses `token` as the shutdown token instead of a fresh one.
    pub fn with_shutdown_token(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn options(&self) -> &DispatchOptions {
        &self.options
    }

    pub fn prefix(&self) -> &str {
        &self.options.prefix
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn transport(&self) -> &BoxedTransport {
        &self.transport
    }

    /// The bot's own account.
    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Records a guild as available. Re-announcements replace the old entry.
    pub fn add_guild(&self, guild: Guild) {
        let mut guilds = self.guilds.write();
        match guilds.iter_mut().find(|g| g.id == guild.id) {
            Some(existing) => *existing = guild,
            None => guilds.push(guild),
        }
    }

    /// Guilds announced by the session so far.
    pub fn guilds(&self) -> Vec<Guild> {
        self.guilds.read().clone()
    }

    /// Token cancelled when the runtime is asked to stop.
    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown
    }

    /// Asks the runtime to stop after in-flight work.
    pub fn request_shutdown(&self) {
        self.shutdown.cancel();
    }
}

impl std::fmt::Debug for BotState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotState")
            .field("options", &self.options)
            .field("user", &self.user)
            .field("commands", &self.registry.len())
            .field("transport", &self.transport.name())
            .finish_non_exhaustive()
    }
}

/// The per-invocation execution context.
#[derive(Clone)]
pub struct CommandContext {
    state: Arc<BotState>,
    message: Arc<MessageEvent>,
    command: Arc<CommandDescriptor>,
    raw_args: String,
    cancel: CancellationToken,
}

impl CommandContext {
    pub(crate) fn new(
        state: Arc<BotState>,
        message: Arc<MessageEvent>,
        command: Arc<CommandDescriptor>,
        raw_args: String,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            state,
            message,
            command,
            raw_args,
            cancel,
        }
    }

    pub fn state(&self) -> &Arc<BotState> {
        &self.state
    }

    pub fn transport(&self) -> &BoxedTransport {
        self.state.transport()
    }

    /// The message that triggered the invocation.
    pub fn message(&self) -> &MessageEvent {
        &self.message
    }

    /// The invoking user.
    pub fn user(&self) -> &User {
        &self.message.author.user
    }

    /// The invoking user with guild role memberships.
    pub fn member(&self) -> &Member {
        &self.message.author
    }

    /// The originating guild; `None` in direct messages.
    pub fn guild(&self) -> Option<&Guild> {
        self.message.guild.as_ref()
    }

    pub fn channel(&self) -> &Channel {
        &self.message.channel
    }

    /// The resolved command.
    pub fn command(&self) -> &CommandDescriptor {
        &self.command
    }

    /// Everything after the command token, with leading whitespace removed.
    pub fn args(&self) -> &str {
        &self.raw_args
    }

    /// Parses the raw arguments as a clap command.
    ///
    /// The command's qualified name is used as `argv[0]`; any parse failure
    /// becomes [`CommandError::Arguments`](crate::CommandError::Arguments).
    pub fn parse<T: Parser>(&self) -> CommandResult<T> {
        parse_args(self.command.name(), &self.raw_args)
    }

    /// Cancelled when the invocation exceeds its execution budget or the
    /// runtime shuts down. Long-running handlers should select on it.
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Sends `message` to the originating channel.
    pub async fn reply(&self, message: impl Into<OutgoingMessage>) -> CommandResult<MessageId> {
        let id = self
            .transport()
            .send(self.message.channel.id, message.into())
            .await?;
        Ok(id)
    }

    /// Sends a titled, colored embed to the originating channel.
    pub async fn respond(
        &self,
        title: impl Into<String>,
        description: impl Into<String>,
        color: Color,
    ) -> CommandResult<MessageId> {
        self.reply(Embed::new(title, description).color(color)).await
    }
}

impl std::fmt::Debug for CommandContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandContext")
            .field("command", &self.command.name())
            .field("user", &self.message.author.user.name)
            .field("channel", &self.message.channel.id)
            .field("raw_args", &self.raw_args)
            .finish_non_exhaustive()
    }
}
