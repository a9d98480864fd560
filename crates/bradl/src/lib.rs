//! # Bradl
//!
//! A chat command bot with permission tiers.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐  events  ┌────────────┐     ┌──────────────────┐
//! │ Transport  │────────▶│ BotRuntime │────▶│ Dispatcher (task) │──▶ handler
//! │ (session)  │◀────────│            │────▶│ Dispatcher (task) │──▶ handler
//! └────────────┘  replies └────────────┘     └──────────────────┘
//! ```
//!
//! - **Transport**: the chat session; yields events and delivers replies
//! - **Runtime**: loads configuration, drives the event stream, spawns dispatches
//! - **Dispatcher**: prefix detection, lookup, permission check, execution
//! - **Responder**: turns failed dispatches into user-facing embeds
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bradl::prelude::*;
//! use bradl::transport::ConsoleTransport;
//!
//! async fn hello(ctx: CommandContext) -> CommandResult {
//!     ctx.reply("hello!").await?;
//!     Ok(())
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     BotRuntime::builder()
//!         .config_file("config.json")
//!         .groups(bradl::commands::groups())
//!         .command(CommandDescriptor::new("hello", hello))
//!         .transport(std::sync::Arc::new(ConsoleTransport::stdio()))
//!         .build()?
//!         .run()
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `commands`: the built-in command sets (default)
//! - `console`: the stdin/stdout transport (default)
//! - `json-log`: JSON log output

#[cfg(feature = "commands")]
pub use bradl_commands as commands;
pub use bradl_core as core;
pub use bradl_framework as framework;
pub use bradl_runtime as runtime;
pub use bradl_transport as transport;

/// Commonly used types for writing commands and starting the bot.
///
/// ```rust,ignore
/// use bradl::prelude::*;
/// ```
pub mod prelude {
    // Runtime - main entry point
    pub use bradl_runtime::{BotConfig, BotRuntime, ConfigLoader, LoggingBuilder};

    // Commands - descriptors, groups and the handler context
    pub use bradl_framework::{
        Capability, CommandContext, CommandDescriptor, CommandError, CommandGroup, CommandResult,
        Outcome,
    };

    // Domain types used in replies
    pub use bradl_core::{Color, Embed, OutgoingMessage, Transport, emoji};
}
