//! Gateway entities carried by inbound events.

use serde::{Deserialize, Serialize};

use crate::id::{ChannelId, GuildId, UserId};

/// A user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Whether the account is a bot account.
    #[serde(default)]
    pub bot: bool,
}

impl User {
    pub fn new(id: impl Into<UserId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            bot: false,
        }
    }
}

/// A guild-defined role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: u64,
    pub name: String,
}

impl Role {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A user as seen from inside one guild, together with its role memberships.
///
/// For direct messages the role list is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub user: User,
    #[serde(default)]
    pub roles: Vec<Role>,
}

impl Member {
    pub fn new(user: User) -> Self {
        Self {
            user,
            roles: Vec::new(),
        }
    }

    /// Adds a role (builder pattern).
    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.push(role);
        self
    }

    /// Returns `true` if the member holds a role whose name matches `name`,
    /// ignoring ASCII case.
    pub fn has_role_named(&self, name: &str) -> bool {
        self.roles
            .iter()
            .any(|role| role.name.eq_ignore_ascii_case(name))
    }
}

/// A guild (server).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guild {
    pub id: GuildId,
    pub name: String,
}

impl Guild {
    pub fn new(id: impl Into<GuildId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A text channel or direct-message conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: ChannelId,
    pub name: String,
}

impl Channel {
    pub fn new(id: impl Into<ChannelId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
