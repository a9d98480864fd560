//! Snowflake identifiers.
//!
//! Every entity the gateway knows about is addressed by a 64-bit snowflake.
//! The newtypes keep users, guilds, channels and messages from being mixed up.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned when a string is not a valid identifier or mention.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a valid id or mention")]
pub struct ParseIdError(pub String);

macro_rules! snowflake {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Returns the raw snowflake value.
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }
    };
}

snowflake!(
    /// A user (or bot account) identifier.
    UserId
);
snowflake!(
    /// A guild (server) identifier.
    GuildId
);
snowflake!(
    /// A channel identifier.
    ChannelId
);
snowflake!(
    /// A message identifier.
    MessageId
);

impl UserId {
    /// Renders the mention form used in message content (`<@id>`).
    pub fn mention(self) -> String {
        format!("<@{}>", self.0)
    }
}

/// Parses a bare id as well as the `<@id>` and `<@!id>` mention forms.
impl FromStr for UserId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let inner = trimmed
            .strip_prefix("<@")
            .and_then(|rest| rest.strip_suffix('>'))
            .map(|rest| rest.strip_prefix('!').unwrap_or(rest))
            .unwrap_or(trimmed);

        inner
            .parse::<u64>()
            .map(UserId)
            .map_err(|_| ParseIdError(s.to_string()))
    }
}

impl FromStr for ChannelId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let inner = trimmed
            .strip_prefix("<#")
            .and_then(|rest| rest.strip_suffix('>'))
            .unwrap_or(trimmed);

        inner
            .parse::<u64>()
            .map(ChannelId)
            .map_err(|_| ParseIdError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_forms() {
        assert_eq!("42".parse::<UserId>(), Ok(UserId(42)));
        assert_eq!("<@42>".parse::<UserId>(), Ok(UserId(42)));
        assert_eq!("<@!42>".parse::<UserId>(), Ok(UserId(42)));
    }

    #[test]
    fn test_user_id_rejects_garbage() {
        assert!("@someone".parse::<UserId>().is_err());
        assert!("<@abc>".parse::<UserId>().is_err());
        assert!("".parse::<UserId>().is_err());
    }

    #[test]
    fn test_mention_matches_parser() {
        let id = UserId(1234567890);
        assert_eq!(id.mention().parse::<UserId>(), Ok(id));
    }

    #[test]
    fn test_channel_mention() {
        assert_eq!("<#7>".parse::<ChannelId>(), Ok(ChannelId(7)));
    }
}
