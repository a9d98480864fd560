//! Guild moderation commands.
//!
//! All of these need the `moderator` role and therefore only run inside a
//! guild. The actual work is delegated to the transport; a transport that
//! lacks the capability surfaces as an `Unsupported` fault.

use clap::Parser;
use tracing::info;

use bradl_core::{Color, Guild, UserId, emoji};
use bradl_framework::{
    Capability, CommandContext, CommandDescriptor, CommandError, CommandGroup, CommandResult,
};

pub fn group() -> CommandGroup {
    CommandGroup::new("moderator")
        .capability(Capability::Moderator)
        .command(
            CommandDescriptor::new("kick", kick)
                .summary("Removes a member from the guild")
                .usage("<member> [reason...]"),
        )
        .command(
            CommandDescriptor::new("ban", ban)
                .summary("Bans a member from the guild")
                .usage("<member> [--days N] [reason...]"),
        )
        .command(
            CommandDescriptor::new("unban", unban)
                .summary("Lifts a ban")
                .usage("<member>"),
        )
        .command(
            CommandDescriptor::new("purge", purge)
                .alias("clear")
                .summary("Deletes recent messages in this channel")
                .usage("<count>"),
        )
}

fn require_guild(ctx: &CommandContext) -> CommandResult<&Guild> {
    ctx.guild()
        .ok_or_else(|| CommandError::fault("InvalidOperation", "this command only works in a guild"))
}

fn reason(words: &[String]) -> Option<String> {
    let reason = words.join(" ");
    (!reason.trim().is_empty()).then_some(reason)
}

#[derive(Parser, Debug)]
struct KickArgs {
    /// Member to kick, as a mention or id.
    member: UserId,
    reason: Vec<String>,
}

async fn kick(ctx: CommandContext) -> CommandResult {
    let args: KickArgs = ctx.parse()?;
    let guild = require_guild(&ctx)?;
    let reason = reason(&args.reason);

    ctx.transport()
        .kick(guild.id, args.member, reason.as_deref())
        .await?;
    info!(guild = %guild.name, member = %args.member, moderator = %ctx.user().name, "Kicked member");

    ctx.respond(
        "Kicked",
        format!(
            "{} {} was kicked. Reason: {}",
            emoji::glyph_or_name(":boot:"),
            args.member.mention(),
            reason.as_deref().unwrap_or("none given")
        ),
        Color::GOLD,
    )
    .await?;
    Ok(())
}

#[derive(Parser, Debug)]
struct BanArgs {
    /// Member to ban, as a mention or id.
    member: UserId,
    /// Days of message history to delete.
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=7))]
    days: u8,
    reason: Vec<String>,
}

async fn ban(ctx: CommandContext) -> CommandResult {
    let args: BanArgs = ctx.parse()?;
    let guild = require_guild(&ctx)?;
    let reason = reason(&args.reason);

    ctx.transport()
        .ban(guild.id, args.member, args.days, reason.as_deref())
        .await?;
    info!(guild = %guild.name, member = %args.member, days = args.days, moderator = %ctx.user().name, "Banned member");

    ctx.respond(
        "Banned",
        format!(
            "{} {} was banned. Reason: {}",
            emoji::glyph_or_name(":hammer:"),
            args.member.mention(),
            reason.as_deref().unwrap_or("none given")
        ),
        Color::RED,
    )
    .await?;
    Ok(())
}

#[derive(Parser, Debug)]
struct UnbanArgs {
    member: UserId,
}

async fn unban(ctx: CommandContext) -> CommandResult {
    let args: UnbanArgs = ctx.parse()?;
    let guild = require_guild(&ctx)?;

    ctx.transport().unban(guild.id, args.member).await?;
    info!(guild = %guild.name, member = %args.member, moderator = %ctx.user().name, "Unbanned member");

    ctx.respond(
        "Unbanned",
        format!(
            "{} {} may join again.",
            emoji::glyph_or_name(":white_check_mark:"),
            args.member.mention()
        ),
        Color::GREEN,
    )
    .await?;
    Ok(())
}

#[derive(Parser, Debug)]
struct PurgeArgs {
    /// How many messages to delete.
    #[arg(value_parser = clap::value_parser!(u16).range(1..=100))]
    count: u16,
}

async fn purge(ctx: CommandContext) -> CommandResult {
    let args: PurgeArgs = ctx.parse()?;
    let channel = ctx.channel().id;

    let deleted = ctx
        .transport()
        .delete_messages(channel, usize::from(args.count))
        .await?;
    info!(%channel, requested = args.count, deleted, "Purged messages");

    ctx.respond(
        "Purged",
        format!(
            "{} Deleted {deleted} message{}.",
            emoji::glyph_or_name(":wastebasket:"),
            if deleted == 1 { "" } else { "s" }
        ),
        Color::GOLD,
    )
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Harness, moderator, owner, user};
    use bradl_core::GuildId;
    use bradl_framework::Outcome;
    use bradl_transport::Action;

    #[tokio::test]
    async fn test_kick_with_reason() {
        let harness = Harness::new();
        let outcome = harness.run(moderator(), "!kick <@42> being rude").await;
        assert!(outcome.is_success());
        assert_eq!(
            harness.moderation(),
            vec![Action::Kicked {
                guild: GuildId(20),
                user: UserId(42),
                reason: Some("being rude".into())
            }]
        );
        let reply = harness.reply();
        assert!(reply.as_embed().unwrap().description.contains("<@42>"));
    }

    #[tokio::test]
    async fn test_kick_denied_for_users_and_owner_without_role() {
        for member in [user(), owner()] {
            let harness = Harness::new();
            let outcome = harness.run(member, "!kick <@42>").await;
            assert!(matches!(outcome, Outcome::PreconditionFailed { .. }));
            assert!(harness.moderation().is_empty());
            assert_eq!(harness.reply().as_embed().unwrap().title, "Access Denied");
        }
    }

    #[tokio::test]
    async fn test_ban_days_and_reason() {
        let harness = Harness::new();
        let outcome = harness.run(moderator(), "!ban 42 --days 3 spam links").await;
        assert!(outcome.is_success());
        assert_eq!(
            harness.moderation(),
            vec![Action::Banned {
                guild: GuildId(20),
                user: UserId(42),
                delete_message_days: 3,
                reason: Some("spam links".into())
            }]
        );
    }

    #[tokio::test]
    async fn test_ban_without_target_points_at_help() {
        let harness = Harness::new();
        let outcome = harness.run(moderator(), "!ban").await;
        assert!(matches!(outcome, Outcome::ArgumentError { .. }));
        let body = harness.reply().as_embed().unwrap().description.clone();
        assert!(body.contains("!help ban"));
        assert!(harness.moderation().is_empty());
    }

    #[tokio::test]
    async fn test_ban_days_out_of_range() {
        let harness = Harness::new();
        let outcome = harness.run(moderator(), "!ban <@42> --days 30").await;
        assert!(matches!(outcome, Outcome::ArgumentError { .. }));
    }

    #[tokio::test]
    async fn test_unban() {
        let harness = Harness::new();
        assert!(harness.run(moderator(), "!unban <@!42>").await.is_success());
        assert_eq!(
            harness.moderation(),
            vec![Action::Unbanned {
                guild: GuildId(20),
                user: UserId(42)
            }]
        );
    }

    #[tokio::test]
    async fn test_purge_alias() {
        let harness = Harness::new();
        assert!(harness.run(moderator(), "!clear 5").await.is_success());
        assert_eq!(harness.moderation().len(), 1);
        assert!(harness.reply().as_embed().unwrap().description.contains("Deleted 5 messages"));

        let harness = Harness::new();
        assert!(matches!(
            harness.run(moderator(), "!purge 0").await,
            Outcome::ArgumentError { .. }
        ));
    }
}
