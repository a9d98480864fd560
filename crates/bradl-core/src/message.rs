//! Outbound message types.
//!
//! Responses are either plain text or a single titled, colored [`Embed`]
//! block. Transports decide how an embed is rendered on the wire.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// A 24-bit RGB embed color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    /// Used by every error-path response.
    pub const RED: Self = Self(0xFF0000);
    pub const GREEN: Self = Self(0x2ECC71);
    pub const BLURPLE: Self = Self(0x5865F2);
    pub const GOLD: Self = Self(0xF1C40F);

    pub const fn rgb(self) -> u32 {
        self.0
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

/// A named field inside an embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub inline: bool,
}

/// A titled, colored message block.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
}

impl Embed {
    /// Creates an embed with the given title and body.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    /// Sets the color (builder pattern).
    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Appends a field (builder pattern).
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }
}

impl Display for Embed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.title, self.description)?;
        for field in &self.fields {
            write!(f, "\n  {}: {}", field.name, field.value)?;
        }
        Ok(())
    }
}

/// A message sent through [`Transport::send`](crate::Transport::send).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum OutgoingMessage {
    Text(String),
    Embed(Embed),
}

impl OutgoingMessage {
    /// Returns the embed if this is an embed message.
    pub fn as_embed(&self) -> Option<&Embed> {
        match self {
            Self::Embed(embed) => Some(embed),
            Self::Text(_) => None,
        }
    }

    /// Returns the text if this is a plain text message.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Embed(_) => None,
        }
    }
}

impl Display for OutgoingMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "{text}"),
            Self::Embed(embed) => write!(f, "{embed}"),
        }
    }
}

impl From<String> for OutgoingMessage {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for OutgoingMessage {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Embed> for OutgoingMessage {
    fn from(embed: Embed) -> Self {
        Self::Embed(embed)
    }
}
