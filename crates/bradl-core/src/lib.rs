//! # Bradl Core
//!
//! Foundation types shared by every BradlBot crate.
//!
//! This crate has no opinion about commands; it only describes what the
//! messaging gateway delivers and what it can be asked to do:
//!
//! - **Identity**: snowflake newtypes ([`UserId`], [`GuildId`], [`ChannelId`], [`MessageId`])
//! - **Model**: [`User`], [`Member`], [`Role`], [`Guild`], [`Channel`]
//! - **Events**: the tagged inbound stream ([`TransportEvent`], [`MessageEvent`])
//! - **Transport**: the session capability ([`Transport`], [`Session`])
//! - **Rendering**: outbound messages ([`OutgoingMessage`], [`Embed`], [`Color`], [`emoji`])
//!
//! ```text
//! ┌───────────┐  TransportEvent  ┌────────────┐  OutgoingMessage  ┌───────────┐
//! │  Gateway  │─────────────────▶│  Runtime   │──────────────────▶│ Transport │
//! └───────────┘                  └────────────┘                   └───────────┘
//! ```

pub mod emoji;
pub mod error;
pub mod event;
pub mod id;
pub mod message;
pub mod model;
pub mod transport;

pub use error::{TransportError, TransportResult};
pub use event::{MessageEvent, TransportEvent};
pub use id::{ChannelId, GuildId, MessageId, ParseIdError, UserId};
pub use message::{Color, Embed, EmbedField, OutgoingMessage};
pub use model::{Channel, Guild, Member, Role, User};
pub use transport::{BoxedTransport, EventStream, Session, Transport};

/// Prelude for common imports.
pub mod prelude {
    pub use super::{
        Channel, ChannelId, Color, Embed, Guild, GuildId, Member, MessageEvent, OutgoingMessage,
        Role, Transport, TransportError, TransportEvent, User, UserId,
    };
}
