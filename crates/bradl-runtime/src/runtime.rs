//! The event-intake loop.
//!
//! [`BotRuntime`] connects the transport, builds the shared [`BotState`],
//! and consumes the session's event stream. Lifecycle events are logged;
//! every message is dispatched on its own task, so a slow or failing
//! invocation never holds up the loop.
//!
//! ```rust,ignore
//! use bradl_runtime::BotRuntime;
//!
//! let runtime = BotRuntime::builder()
//!     .config_file("config.json")
//!     .group(bradl_commands::user::group())
//!     .transport(transport)
//!     .build()?;
//!
//! // Run until Ctrl+C, SIGTERM or the `shutdown` command
//! runtime.run().await?;
//! ```

use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::StreamExt;
use tokio::signal;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, Level, debug, error, info, span, warn};

use bradl_core::{BoxedTransport, TransportEvent};
use bradl_framework::{
    BotState, CommandDescriptor, CommandGroup, CommandRegistry, Dispatcher, Outcome,
};

use crate::config::{BotConfig, ConfigLoader};
use crate::error::{RuntimeError, RuntimeResult};

/// The BradlBot runtime.
pub struct BotRuntime {
    config: BotConfig,
    registry: Arc<CommandRegistry>,
    transport: BoxedTransport,
    shutdown: CancellationToken,
    running: AtomicBool,
}

impl BotRuntime {
    pub fn new(config: BotConfig, registry: CommandRegistry, transport: BoxedTransport) -> Self {
        Self {
            config,
            registry: Arc::new(registry),
            transport,
            shutdown: CancellationToken::new(),
            running: AtomicBool::new(false),
        }
    }

    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Cancelling this token stops the current run and every later one.
    ///
    /// Each run works on a child of this token, so the `shutdown` command
    /// only ends the run it was issued in.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Runs until Ctrl+C, SIGTERM, a shutdown request, or the end of the
    /// event stream.
    pub async fn run(&self) -> RuntimeResult<()> {
        self.run_until(wait_for_shutdown()).await
    }

    /// Runs until `shutdown` completes, a shutdown request, or the end of
    /// the event stream.
    pub async fn run_until<F>(&self, shutdown: F) -> RuntimeResult<()>
    where
        F: Future<Output = ()>,
    {
        if self.running.swap(true, Ordering::AcqRel) {
            return Err(RuntimeError::AlreadyRunning);
        }
        let result = self.serve(shutdown).await;
        self.running.store(false, Ordering::Release);
        result
    }

    async fn serve<F>(&self, shutdown: F) -> RuntimeResult<()>
    where
        F: Future<Output = ()>,
    {
        info!(
            transport = self.transport.name(),
            commands = self.registry.len(),
            "Connecting"
        );
        let session = self.transport.connect(&self.config.token).await?;
        let run = self.shutdown.child_token();

        let state = Arc::new(
            BotState::new(
                self.config.dispatch_options(),
                Arc::clone(&self.registry),
                Arc::clone(&self.transport),
                session.user.clone(),
            )
            .with_shutdown_token(run.clone()),
        );
        let dispatcher = Dispatcher::new(Arc::clone(&state));

        info!(user = %session.user.name, prefix = %self.config.prefix, "BradlBot runtime is now running");

        let mut events = session.events;
        let mut tasks: JoinSet<Outcome> = JoinSet::new();
        tokio::pin!(shutdown);

        let stop_requested = loop {
            tokio::select! {
                () = &mut shutdown => {
                    info!("Shutdown signal received");
                    break true;
                }
                () = run.cancelled() => {
                    info!(target: "BradlBot", "Shutdown requested");
                    break true;
                }
                event = events.next() => match event {
                    Some(event) => handle_event(event, &state, &dispatcher, &mut tasks),
                    None => {
                        warn!("Transport event stream ended");
                        break false;
                    }
                },
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => reap(joined),
            }
        };

        // Only an explicit stop cancels in-flight handlers; after the stream
        // ends they run to completion.
        if stop_requested {
            run.cancel();
        }
        if !tasks.is_empty() {
            debug!(in_flight = tasks.len(), "Waiting for in-flight commands");
        }
        while let Some(joined) = tasks.join_next().await {
            reap(joined);
        }

        if let Err(e) = self.transport.disconnect().await {
            warn!(error = %e, "Failed to disconnect transport");
        }
        info!(uptime_secs = state.uptime().as_secs(), "Runtime stopped");
        Ok(())
    }
}

fn handle_event(
    event: TransportEvent,
    state: &Arc<BotState>,
    dispatcher: &Dispatcher,
    tasks: &mut JoinSet<Outcome>,
) {
    match event {
        TransportEvent::Ready { user } => {
            info!(target: "BradlBot", user = %user.name, "Client is ready to process events");
        }
        TransportEvent::GuildAvailable(guild) => {
            info!(target: "BradlBot", "Guild available: {}", guild.name);
            state.add_guild(guild);
        }
        TransportEvent::Error(e) => {
            error!(target: "BradlBot", "Exception: {}: {}", e.kind(), e);
        }
        TransportEvent::Message(message) => {
            let dispatcher = dispatcher.clone();
            let span = span!(Level::TRACE, "intake", message_id = %message.id);
            tasks.spawn(async move { dispatcher.dispatch(message).await }.instrument(span));
        }
    }
}

fn reap(joined: Result<Outcome, tokio::task::JoinError>) {
    match joined {
        Ok(outcome) => debug!(outcome = outcome.kind(), command = ?outcome.command(), "Dispatch finished"),
        Err(e) => error!(error = %e, "Dispatch task failed"),
    }
}

/// Waits for Ctrl+C or, on Unix, SIGTERM.
async fn wait_for_shutdown() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => tokio::select! {
                () = ctrl_c => info!("Received Ctrl+C, shutting down"),
                _ = sigterm.recv() => info!("Received SIGTERM, shutting down"),
            },
            Err(e) => {
                warn!(error = %e, "Failed to register SIGTERM handler");
                ctrl_c.await;
                info!("Received Ctrl+C, shutting down");
            }
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await;
        info!("Received Ctrl+C, shutting down");
    }
}

/// Builder for a [`BotRuntime`].
pub struct RuntimeBuilder {
    config: Option<BotConfig>,
    config_loader: ConfigLoader,
    groups: Vec<CommandGroup>,
    commands: Vec<CommandDescriptor>,
    transport: Option<BoxedTransport>,
}

impl RuntimeBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            config_loader: ConfigLoader::new(),
            groups: Vec::new(),
            commands: Vec::new(),
            transport: None,
        }
    }

    /// Uses an already loaded configuration instead of the loader.
    pub fn config(mut self, config: BotConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.file(path);
        self
    }

    pub fn config_loader(mut self, loader: ConfigLoader) -> Self {
        self.config_loader = loader;
        self
    }

    pub fn group(mut self, group: CommandGroup) -> Self {
        self.groups.push(group);
        self
    }

    pub fn groups(mut self, groups: impl IntoIterator<Item = CommandGroup>) -> Self {
        self.groups.extend(groups);
        self
    }

    pub fn command(mut self, command: CommandDescriptor) -> Self {
        self.commands.push(command);
        self
    }

    pub fn transport(mut self, transport: BoxedTransport) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Loads the configuration (unless given) and registers every command.
    pub fn build(self) -> RuntimeResult<BotRuntime> {
        let config = match self.config {
            Some(config) => {
                crate::config::validate_config(&config)?;
                config
            }
            None => self.config_loader.load()?,
        };

        let mut registry = CommandRegistry::new();
        for group in self.groups {
            registry.register_group(group)?;
        }
        for command in self.commands {
            registry.register(command)?;
        }

        let transport = self.transport.ok_or(RuntimeError::MissingTransport)?;
        Ok(BotRuntime::new(config, registry, transport))
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
