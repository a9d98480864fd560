//! # Bradl Commands
//!
//! The three command sets BradlBot ships with, one module per capability
//! tier:
//!
//! | Module | Tier | Commands |
//! |--------|------|----------|
//! | [`user`] | User | `ping`, `uptime`, `whoami`, `help`, `roll` |
//! | [`moderator`] | Moderator | `kick`, `ban`, `unban`, `purge` |
//! | [`owner`] | Owner | `say`, `shutdown`, `guilds` |
//!
//! ```rust,ignore
//! let registry = bradl_commands::registry()?;
//! ```

use bradl_framework::{CommandGroup, CommandRegistry, RegistryError};

pub mod moderator;
pub mod owner;
pub mod user;

/// Every built-in command group, in registration order.
pub fn groups() -> Vec<CommandGroup> {
    vec![user::group(), moderator::group(), owner::group()]
}

/// A registry holding every built-in command.
pub fn registry() -> Result<CommandRegistry, RegistryError> {
    let mut registry = CommandRegistry::new();
    for group in groups() {
        registry.register_group(group)?;
    }
    Ok(registry)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_commands_register_cleanly() {
        let registry = registry().unwrap();
        for token in [
            "ping", "pong", "uptime", "whoami", "help", "roll", "kick", "ban", "unban", "purge",
            "clear", "say", "shutdown", "guilds",
        ] {
            assert!(registry.resolve(token).is_some(), "{token} missing");
        }
        assert_eq!(registry.len(), 12);
    }
}
