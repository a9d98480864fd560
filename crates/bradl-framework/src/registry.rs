//! The command registry.
//!
//! Built once at startup from the three handler groups, then shared
//! read-only for the lifetime of the process.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::debug;

use crate::descriptor::{CommandDescriptor, CommandGroup};
use crate::error::RegistryError;

/// Maps qualified names and aliases to their [`CommandDescriptor`].
///
/// Invariant: every key (name or alias) maps to exactly one descriptor.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    /// Descriptors in registration order.
    commands: Vec<Arc<CommandDescriptor>>,
    names: HashMap<String, Arc<CommandDescriptor>>,
    aliases: HashMap<String, Arc<CommandDescriptor>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one descriptor.
    ///
    /// Fails with [`RegistryError::DuplicateCommand`] if its name or any
    /// alias is already taken; the registry is left unchanged in that case.
    pub fn register(&mut self, descriptor: CommandDescriptor) -> Result<(), RegistryError> {
        self.ensure_available(std::slice::from_ref(&descriptor))?;
        self.insert(descriptor);
        Ok(())
    }

    /// Registers a whole group atomically: either every command is added or
    /// none is.
    pub fn register_group(&mut self, group: CommandGroup) -> Result<(), RegistryError> {
        let group_name = group.name().to_string();
        let commands = group.into_commands();
        self.ensure_available(&commands)?;

        let count = commands.len();
        for descriptor in commands {
            self.insert(descriptor);
        }
        debug!(group = %group_name, count, "Registered command group");
        Ok(())
    }

    /// Exact, case-sensitive lookup: qualified names first, then aliases.
    pub fn resolve(&self, token: &str) -> Option<Arc<CommandDescriptor>> {
        self.names
            .get(token)
            .or_else(|| self.aliases.get(token))
            .cloned()
    }

    /// Iterates descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<CommandDescriptor>> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn is_taken(&self, key: &str) -> bool {
        self.names.contains_key(key) || self.aliases.contains_key(key)
    }

    /// Checks every key of `candidates` against the registry and against
    /// each other.
    fn ensure_available(&self, candidates: &[CommandDescriptor]) -> Result<(), RegistryError> {
        let mut seen = HashSet::new();
        for descriptor in candidates {
            for key in descriptor.keys() {
                if self.is_taken(key) || !seen.insert(key) {
                    return Err(RegistryError::DuplicateCommand {
                        name: key.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    fn insert(&mut self, descriptor: CommandDescriptor) {
        let descriptor = Arc::new(descriptor);
        for alias in descriptor.aliases() {
            self.aliases
                .insert(alias.to_string(), Arc::clone(&descriptor));
        }
        self.names
            .insert(descriptor.name().to_string(), Arc::clone(&descriptor));
        self.commands.push(descriptor);
    }
}
