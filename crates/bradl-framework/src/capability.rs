//! Capability tiers and the precondition check.

use std::fmt;

use bradl_core::{Guild, Member, UserId};

/// A coarse permission level required to invoke a command.
///
/// Tiers are ordered: `User < Moderator < Owner`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Capability {
    /// Anyone may invoke.
    #[default]
    User,
    /// Requires a guild role named `moderator`.
    Moderator,
    /// Requires a guild role named `owner`, or the configured bot owner.
    Owner,
}

impl Capability {
    /// The role name that grants this capability.
    pub fn role_name(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Moderator => "moderator",
            Self::Owner => "owner",
        }
    }

    /// Returns `true` if `member` may invoke a command requiring this capability.
    ///
    /// Role names are compared case-insensitively and only count inside a
    /// guild; in direct messages only `User` commands (and `Owner` commands
    /// for the bot owner) pass.
    pub fn check(self, member: &Member, guild: Option<&Guild>, owner: Option<UserId>) -> bool {
        match self {
            Self::User => true,
            Self::Moderator => guild.is_some() && member.has_role_named(self.role_name()),
            Self::Owner => {
                owner == Some(member.user.id)
                    || (guild.is_some() && member.has_role_named(self.role_name()))
            }
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.role_name())
    }
}
