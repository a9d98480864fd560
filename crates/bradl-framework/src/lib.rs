//! # Bradl Framework
//!
//! The command pipeline: everything between "a message arrived" and "the
//! user saw a reply".
//!
//! ```text
//! MessageEvent ──▶ Dispatcher ──▶ CommandRegistry::resolve
//!                      │                 │
//!                      │          Capability::check
//!                      │                 │
//!                      │            handler(CommandContext)
//!                      ▼                 │
//!                   Outcome ◀────────────┘
//!                      │
//!                      └──▶ Responder (non-success only) ──▶ Transport::send
//! ```
//!
//! - [`CommandRegistry`]: static name/alias → [`CommandDescriptor`] mapping
//! - [`Capability`]: the User / Moderator / Owner permission tiers
//! - [`Dispatcher`]: prefix detection, resolution, authorization, execution
//! - [`Outcome`]: the tagged result of one dispatch
//! - [`responder`]: maps non-success outcomes to response embeds

pub mod capability;
pub mod context;
pub mod descriptor;
pub mod dispatcher;
pub mod error;
pub mod outcome;
pub mod parse;
pub mod registry;
pub mod responder;

pub use capability::Capability;
pub use context::{BotState, CommandContext, DispatchOptions, UnknownCommandPolicy};
pub use descriptor::{BoxedHandler, CommandDescriptor, CommandGroup, into_handler};
pub use dispatcher::Dispatcher;
pub use error::{CommandError, CommandResult, RegistryError};
pub use outcome::Outcome;
pub use parse::{parse_args, shell_split, split_invocation};
pub use registry::CommandRegistry;
pub use responder::{Responder, classify};
