//! Command dispatcher.
//!
//! The [`Dispatcher`] receives every inbound text message and drives it to
//! exactly one [`Outcome`]:
//!
//! 1. Messages authored by the bot itself are ignored.
//! 2. The literal prefix or a bot mention must lead the message, otherwise
//!    the result is [`Outcome::NotACommand`] and nothing else happens.
//! 3. The remainder is split into command token and raw arguments.
//! 4. The token is resolved against the [`CommandRegistry`](crate::CommandRegistry);
//!    unknown tokens follow the configured [`UnknownCommandPolicy`].
//! 5. The descriptor's [`Capability`](crate::Capability) is checked.
//! 6. The handler runs under the execution budget; errors, panics and
//!    timeouts are all captured as outcomes.
//!
//! Non-success outcomes are passed to the [`Responder`]. The dispatcher is
//! the isolation boundary: nothing a handler does can escape into the
//! caller or into other invocations.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{Instrument, Level, debug, error, info, span, trace};

use bradl_core::MessageEvent;

use crate::context::{BotState, CommandContext, UnknownCommandPolicy};
use crate::descriptor::CommandDescriptor;
use crate::error::CommandError;
use crate::outcome::Outcome;
use crate::parse::{split_invocation, strip_prefix};
use crate::responder::Responder;

/// Reason reported for every capability denial.
pub const INSUFFICIENT_PERMISSIONS: &str = "insufficient permissions";

/// Routes messages to command handlers.
///
/// Cheap to clone; clones share the same [`BotState`].
#[derive(Clone, Debug)]
pub struct Dispatcher {
    state: Arc<BotState>,
    responder: Responder,
}

impl Dispatcher {
    pub fn new(state: Arc<BotState>) -> Self {
        let responder = Responder::new(state.prefix());
        Self { state, responder }
    }

    pub fn state(&self) -> &Arc<BotState> {
        &self.state
    }

    /// Dispatches one message and answers any failure.
    ///
    /// Returns once the handler (if any) has completed and the failure
    /// response (if any) has been sent.
    pub async fn dispatch(&self, message: MessageEvent) -> Outcome {
        let span = span!(
            Level::DEBUG,
            "dispatch",
            message_id = %message.id,
            channel = %message.channel.id,
        );

        async move {
            let message = Arc::new(message);
            let outcome = self.invoke(Arc::clone(&message)).await;
            self.log_outcome(&message, &outcome);

            if outcome.is_failure() {
                self.responder
                    .respond(self.state.transport(), message.channel.id, &outcome)
                    .await;
            }
            outcome
        }
        .instrument(span)
        .await
    }

    /// Runs steps 1–6 without sending any failure response.
    pub async fn invoke(&self, message: Arc<MessageEvent>) -> Outcome {
        let bot = self.state.user();
        if message.author.user.id == bot.id {
            trace!("Ignoring self-authored message");
            return Outcome::NotACommand;
        }

        let options = self.state.options();
        let mention = options.mention_prefix.then_some(bot.id);
        let Some(invocation) = strip_prefix(&message.content, &options.prefix, mention) else {
            return Outcome::NotACommand;
        };

        let (token, raw_args) = split_invocation(invocation);
        if token.is_empty() {
            return Outcome::NotACommand;
        }

        let Some(descriptor) = self.state.registry().resolve(token) else {
            return match options.unknown_command {
                UnknownCommandPolicy::Ignore => {
                    debug!(token, "Ignoring unknown command");
                    Outcome::NotACommand
                }
                UnknownCommandPolicy::Respond => Outcome::ArgumentError {
                    command: None,
                    detail: format!("unknown command '{token}'"),
                },
            };
        };

        let required = descriptor.required_capability();
        if !required.check(&message.author, message.guild.as_ref(), options.owner) {
            return Outcome::PreconditionFailed {
                command: descriptor.name().to_string(),
                reason: INSUFFICIENT_PERMISSIONS.to_string(),
            };
        }

        let raw_args = raw_args.to_string();
        self.execute(descriptor, message, raw_args).await
    }

    async fn execute(
        &self,
        descriptor: Arc<CommandDescriptor>,
        message: Arc<MessageEvent>,
        raw_args: String,
    ) -> Outcome {
        let name = descriptor.name().to_string();
        let cancel = self.state.shutdown_token().child_token();
        let ctx = CommandContext::new(
            Arc::clone(&self.state),
            message,
            Arc::clone(&descriptor),
            raw_args,
            cancel.clone(),
        );

        let budget = self.state.options().handler_timeout;
        let running = AssertUnwindSafe((descriptor.handler())(ctx)).catch_unwind();

        match tokio::time::timeout(budget, running).await {
            Ok(Ok(Ok(()))) => Outcome::Success { command: name },
            Ok(Ok(Err(CommandError::Arguments { detail }))) => Outcome::ArgumentError {
                command: Some(name),
                detail,
            },
            Ok(Ok(Err(CommandError::Fault { kind, message }))) => Outcome::HandlerFault {
                command: name,
                kind,
                message,
            },
            Ok(Err(payload)) => Outcome::HandlerFault {
                command: name,
                kind: "panic".to_string(),
                message: panic_message(payload.as_ref()),
            },
            Err(_) => {
                cancel.cancel();
                Outcome::HandlerFault {
                    command: name,
                    kind: "Timeout".to_string(),
                    message: format!(
                        "command exceeded its {}s execution budget",
                        budget.as_secs_f32()
                    ),
                }
            }
        }
    }

    fn log_outcome(&self, message: &MessageEvent, outcome: &Outcome) {
        let user = &message.author.user.name;
        let guild = message.guild_name();
        let channel = &message.channel.name;

        match outcome {
            Outcome::NotACommand => {}
            Outcome::Success { command } => info!(
                target: "BradlBot",
                "{user} successfully executed '{command}' on {guild} - {channel}"
            ),
            Outcome::PreconditionFailed { command, reason } => error!(
                target: "BradlBot",
                "{user} tried to run '{command}' on {guild} - {channel} but it gave the error: PreconditionFailed: {reason}"
            ),
            Outcome::ArgumentError { command, detail } => error!(
                target: "BradlBot",
                "{user} tried to run '{}' on {guild} - {channel} but it gave the error: ArgumentError: {detail}",
                command.as_deref().unwrap_or("<invalid_cmd>")
            ),
            Outcome::HandlerFault {
                command,
                kind,
                message,
            } => error!(
                target: "BradlBot",
                "{user} tried to run '{command}' on {guild} - {channel} but it gave the error: {kind}: {message}"
            ),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}
