//! Commands reserved for the bot owner.

use tracing::info;

use bradl_core::{Color, Embed, emoji};
use bradl_framework::{
    Capability, CommandContext, CommandDescriptor, CommandError, CommandGroup, CommandResult,
};

pub fn group() -> CommandGroup {
    CommandGroup::new("owner")
        .capability(Capability::Owner)
        .command(
            CommandDescriptor::new("say", say)
                .summary("Repeats a message in this channel")
                .usage("<text...>"),
        )
        .command(CommandDescriptor::new("shutdown", shutdown).summary("Stops the bot"))
        .command(CommandDescriptor::new("guilds", guilds).summary("Lists the guilds the bot is in"))
}

async fn say(ctx: CommandContext) -> CommandResult {
    let text = ctx.args().trim_end();
    if text.is_empty() {
        return Err(CommandError::arguments("nothing to say"));
    }
    ctx.reply(text.to_string()).await?;
    Ok(())
}

async fn shutdown(ctx: CommandContext) -> CommandResult {
    info!(target: "BradlBot", "{} requested shutdown", ctx.user().name);
    ctx.respond(
        "Shutting down",
        format!("{} Goodbye!", emoji::glyph_or_name(":wave:")),
        Color::GOLD,
    )
    .await?;
    ctx.state().request_shutdown();
    Ok(())
}

async fn guilds(ctx: CommandContext) -> CommandResult {
    let guilds = ctx.state().guilds();
    let description = if guilds.is_empty() {
        "No guilds available yet.".to_string()
    } else {
        guilds
            .iter()
            .map(|g| format!("{} ({})", g.name, g.id))
            .collect::<Vec<_>>()
            .join("\n")
    };
    ctx.reply(
        Embed::new(format!("Guilds ({})", guilds.len()), description).color(Color::BLURPLE),
    )
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Harness, guild, moderator, owner};
    use bradl_core::{Member, Role, User};
    use bradl_framework::Outcome;

    #[tokio::test]
    async fn test_say_repeats_raw_text() {
        let harness = Harness::new();
        assert!(harness.run(owner(), "!say  hello   \"world\"").await.is_success());
        assert_eq!(harness.reply().as_text(), Some("hello   \"world\""));
    }

    #[tokio::test]
    async fn test_say_needs_text() {
        let harness = Harness::new();
        assert!(matches!(
            harness.run(owner(), "!say").await,
            Outcome::ArgumentError { .. }
        ));
    }

    #[tokio::test]
    async fn test_owner_role_grants_access_in_guild_only() {
        let holder = Member::new(User::new(9, "co-owner")).with_role(Role::new(31, "Owner"));

        let harness = Harness::new();
        assert!(harness.run(holder.clone(), "!say hi").await.is_success());

        let harness = Harness::new();
        assert!(matches!(
            harness.run_in(holder, None, "!say hi").await,
            Outcome::PreconditionFailed { .. }
        ));
    }

    #[tokio::test]
    async fn test_owner_identity_works_in_direct_messages() {
        let harness = Harness::new();
        assert!(harness.run_in(owner(), None, "!guilds").await.is_success());
        let reply = harness.reply();
        let embed = reply.as_embed().unwrap();
        assert_eq!(embed.title, "Guilds (1)");
        assert!(embed.description.contains(&guild().name));
    }

    #[tokio::test]
    async fn test_moderator_cannot_shut_down() {
        let harness = Harness::new();
        let outcome = harness.run(moderator(), "!shutdown").await;
        assert!(matches!(outcome, Outcome::PreconditionFailed { .. }));
        assert!(!harness.dispatcher.state().shutdown_token().is_cancelled());
    }

    #[tokio::test]
    async fn test_shutdown_requests_stop() {
        let harness = Harness::new();
        assert!(harness.run(owner(), "!shutdown").await.is_success());
        assert!(harness.dispatcher.state().shutdown_token().is_cancelled());
        assert_eq!(harness.reply().as_embed().unwrap().title, "Shutting down");
    }
}
