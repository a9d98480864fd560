//! Command descriptors and handler erasure.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::capability::Capability;
use crate::context::CommandContext;
use crate::error::CommandResult;

/// A type-erased command handler.
pub type BoxedHandler =
    Arc<dyn Fn(CommandContext) -> BoxFuture<'static, CommandResult> + Send + Sync>;

/// Converts an async function into a [`BoxedHandler`].
///
/// ```rust,ignore
/// async fn ping(ctx: CommandContext) -> CommandResult {
///     ctx.reply("Pong!").await?;
///     Ok(())
/// }
///
/// let handler = into_handler(ping);
/// ```
pub fn into_handler<F, Fut>(f: F) -> BoxedHandler
where
    F: Fn(CommandContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = CommandResult> + Send + 'static,
{
    Arc::new(move |ctx| f(ctx).boxed())
}

/// Everything the registry knows about one command.
///
/// Built once at startup and immutable after registration.
#[derive(Clone)]
pub struct CommandDescriptor {
    name: String,
    aliases: BTreeSet<String>,
    capability: Capability,
    summary: String,
    usage: String,
    group: String,
    handler: BoxedHandler,
}

impl CommandDescriptor {
    /// Creates a `User`-tier descriptor with no aliases.
    pub fn new<F, Fut>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(CommandContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CommandResult> + Send + 'static,
    {
        Self {
            name: name.into(),
            aliases: BTreeSet::new(),
            capability: Capability::User,
            summary: String::new(),
            usage: String::new(),
            group: String::new(),
            handler: into_handler(handler),
        }
    }

    /// Adds an alias.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.insert(alias.into());
        self
    }

    /// Sets the required capability.
    pub fn capability(mut self, capability: Capability) -> Self {
        self.capability = capability;
        self
    }

    /// Sets the one-line description shown by `help`.
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Sets the argument synopsis shown by `help`, e.g. `<member> [reason...]`.
    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    /// The qualified (canonical) name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.aliases.iter().map(String::as_str)
    }

    pub fn required_capability(&self) -> Capability {
        self.capability
    }

    pub fn get_summary(&self) -> &str {
        &self.summary
    }

    pub fn get_usage(&self) -> &str {
        &self.usage
    }

    /// Name of the group the command was registered under, empty if none.
    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn handler(&self) -> &BoxedHandler {
        &self.handler
    }

    /// The qualified name followed by every alias.
    pub(crate) fn keys(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases())
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("capability", &self.capability)
            .field("group", &self.group)
            .finish_non_exhaustive()
    }
}

/// A named set of commands registered together.
///
/// Every command in the group requires at least the group's capability.
#[derive(Debug, Clone)]
pub struct CommandGroup {
    name: String,
    capability: Capability,
    commands: Vec<CommandDescriptor>,
}

impl CommandGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            capability: Capability::User,
            commands: Vec::new(),
        }
    }

    /// Sets the minimum capability for every command in the group.
    pub fn capability(mut self, capability: Capability) -> Self {
        self.capability = capability;
        self
    }

    /// Adds a command (builder pattern).
    pub fn command(mut self, command: CommandDescriptor) -> Self {
        self.commands.push(command);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Consumes the group, stamping each descriptor with the group name and
    /// raising its capability to the group minimum.
    pub(crate) fn into_commands(self) -> Vec<CommandDescriptor> {
        let Self {
            name,
            capability,
            commands,
        } = self;
        commands
            .into_iter()
            .map(|mut command| {
                command.group.clone_from(&name);
                command.capability = command.capability.max(capability);
                command
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn noop(_ctx: CommandContext) -> CommandResult {
        Ok(())
    }

    #[test]
    fn test_descriptor_builder() {
        let cmd = CommandDescriptor::new("ban", noop)
            .alias("b")
            .alias("b")
            .capability(Capability::Moderator)
            .summary("Bans a member")
            .usage("<member>");
        assert_eq!(cmd.name(), "ban");
        assert_eq!(cmd.aliases().collect::<Vec<_>>(), vec!["b"]);
        assert_eq!(cmd.keys().collect::<Vec<_>>(), vec!["ban", "b"]);
        assert_eq!(cmd.required_capability(), Capability::Moderator);
    }

    #[test]
    fn test_group_raises_capability() {
        let group = CommandGroup::new("moderator")
            .capability(Capability::Moderator)
            .command(CommandDescriptor::new("kick", noop))
            .command(CommandDescriptor::new("nuke", noop).capability(Capability::Owner));
        let commands = group.into_commands();
        assert_eq!(commands[0].required_capability(), Capability::Moderator);
        assert_eq!(commands[1].required_capability(), Capability::Owner);
        assert!(commands.iter().all(|c| c.group() == "moderator"));
    }
}
