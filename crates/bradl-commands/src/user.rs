//! Commands anyone may run.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::str::FromStr;
use std::time::Duration;

use clap::Parser;
use rand::Rng;

use bradl_core::{Color, Embed, emoji};
use bradl_framework::{
    Capability, CommandContext, CommandDescriptor, CommandError, CommandGroup, CommandResult,
};

pub fn group() -> CommandGroup {
    CommandGroup::new("user")
        .command(
            CommandDescriptor::new("ping", ping)
                .alias("pong")
                .summary("Checks that the bot is responsive"),
        )
        .command(CommandDescriptor::new("uptime", uptime).summary("Shows how long the bot has been running"))
        .command(CommandDescriptor::new("whoami", whoami).summary("Shows who the bot thinks you are"))
        .command(
            CommandDescriptor::new("help", help)
                .summary("Lists the commands you can run, or explains one")
                .usage("[command]"),
        )
        .command(
            CommandDescriptor::new("roll", roll)
                .summary("Rolls dice")
                .usage("[NdM]"),
        )
}

async fn ping(ctx: CommandContext) -> CommandResult {
    ctx.respond(
        "Ping",
        format!("{} Pong!", emoji::glyph_or_name(":ping_pong:")),
        Color::GREEN,
    )
    .await?;
    Ok(())
}

async fn uptime(ctx: CommandContext) -> CommandResult {
    let uptime = format_duration(ctx.state().uptime());
    ctx.respond(
        "Uptime",
        format!("{} Up for {uptime}", emoji::glyph_or_name(":hourglass:")),
        Color::BLURPLE,
    )
    .await?;
    Ok(())
}

/// `1d 2h 3m 4s`, leaving out leading zero units.
fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let parts = [
        (secs / 86_400, "d"),
        (secs / 3_600 % 24, "h"),
        (secs / 60 % 60, "m"),
        (secs % 60, "s"),
    ];
    let out = parts
        .iter()
        .skip_while(|(value, unit)| *value == 0 && *unit != "s")
        .map(|(value, unit)| format!("{value}{unit}"))
        .collect::<Vec<_>>();
    out.join(" ")
}

/// Highest tier `ctx`'s author holds.
fn tier(ctx: &CommandContext) -> Capability {
    let owner = ctx.state().options().owner;
    [Capability::Owner, Capability::Moderator]
        .into_iter()
        .find(|cap| cap.check(ctx.member(), ctx.guild(), owner))
        .unwrap_or(Capability::User)
}

async fn whoami(ctx: CommandContext) -> CommandResult {
    let member = ctx.member();
    let roles = if member.roles.is_empty() {
        "none".to_string()
    } else {
        member
            .roles
            .iter()
            .map(|r| r.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    let embed = Embed::new(member.user.name.clone(), member.user.id.mention())
        .color(Color::BLURPLE)
        .field("Id", member.user.id.to_string(), true)
        .field("Tier", tier(&ctx).to_string(), true)
        .field("Roles", roles, false);
    ctx.reply(embed).await?;
    Ok(())
}

#[derive(Parser, Debug)]
struct HelpArgs {
    /// Command to explain.
    command: Option<String>,
}

async fn help(ctx: CommandContext) -> CommandResult {
    let args: HelpArgs = ctx.parse()?;
    let prefix = ctx.state().prefix().to_string();
    let owner = ctx.state().options().owner;

    let embed = match args.command {
        Some(token) => {
            let token = token.strip_prefix(prefix.as_str()).unwrap_or(&token);
            let command = ctx
                .state()
                .registry()
                .resolve(token)
                .ok_or_else(|| CommandError::arguments(format!("unknown command '{token}'")))?;

            let mut usage = format!("{prefix}{}", command.name());
            if !command.get_usage().is_empty() {
                usage.push(' ');
                usage.push_str(command.get_usage());
            }
            let mut embed = Embed::new(format!("{prefix}{}", command.name()), command.get_summary())
                .color(Color::BLURPLE)
                .field("Usage", format!("`{usage}`"), false)
                .field("Requires", command.required_capability().to_string(), true);
            let aliases: Vec<_> = command.aliases().collect();
            if !aliases.is_empty() {
                embed = embed.field("Aliases", aliases.join(", "), true);
            }
            embed
        }
        None => {
            let mut groups: BTreeMap<&str, String> = BTreeMap::new();
            for command in ctx.state().registry().iter() {
                if !command
                    .required_capability()
                    .check(ctx.member(), ctx.guild(), owner)
                {
                    continue;
                }
                let lines = groups.entry(command.group()).or_default();
                let _ = writeln!(
                    lines,
                    "`{prefix}{}` - {}",
                    command.name(),
                    command.get_summary()
                );
            }

            groups.into_iter().fold(
                Embed::new(
                    "Commands",
                    format!("Use `{prefix}help <command>` for details."),
                )
                .color(Color::BLURPLE),
                |embed, (group, lines)| embed.field(group, lines.trim_end(), false),
            )
        }
    };

    ctx.reply(embed).await?;
    Ok(())
}

/// `NdM`: roll `N` dice with `M` sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Dice {
    count: u32,
    sides: u32,
}

impl FromStr for Dice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (count, sides) = s
            .split_once(['d', 'D'])
            .ok_or_else(|| format!("expected NdM, got '{s}'"))?;
        let count = if count.is_empty() {
            1
        } else {
            count.parse().map_err(|_| format!("invalid dice count '{count}'"))?
        };
        let sides = sides
            .parse()
            .map_err(|_| format!("invalid number of sides '{sides}'"))?;

        if !(1..=100).contains(&count) {
            return Err("dice count must be between 1 and 100".into());
        }
        if !(2..=1000).contains(&sides) {
            return Err("dice must have between 2 and 1000 sides".into());
        }
        Ok(Self { count, sides })
    }
}

#[derive(Parser, Debug)]
struct RollArgs {
    #[arg(default_value = "1d6")]
    dice: Dice,
}

async fn roll(ctx: CommandContext) -> CommandResult {
    let RollArgs { dice } = ctx.parse()?;
    let rolls: Vec<u32> = {
        let mut rng = rand::thread_rng();
        (0..dice.count).map(|_| rng.gen_range(1..=dice.sides)).collect()
    };
    let total: u32 = rolls.iter().sum();

    let mut description = format!(
        "{} {}d{} → **{total}**",
        emoji::glyph_or_name(":game_die:"),
        dice.count,
        dice.sides
    );
    if rolls.len() > 1 {
        let shown: Vec<_> = rolls.iter().map(u32::to_string).collect();
        let _ = write!(description, " ({})", shown.join(" + "));
    }

    ctx.respond("Roll", description, Color::GOLD).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Harness, moderator, owner, user};
    use bradl_core::OutgoingMessage;
    use bradl_framework::Outcome;

    fn embed(message: OutgoingMessage) -> Embed {
        message.as_embed().cloned().expect("expected an embed")
    }

    #[tokio::test]
    async fn test_ping_and_alias() {
        let harness = Harness::new();
        assert!(harness.run(user(), "!pong").await.is_success());
        let reply = embed(harness.reply());
        assert_eq!(reply.title, "Ping");
        assert!(reply.description.contains("Pong!"));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(0)), "0s");
        assert_eq!(format_duration(Duration::from_secs(65)), "1m 5s");
        assert_eq!(format_duration(Duration::from_secs(3_600)), "1h 0m 0s");
        assert_eq!(
            format_duration(Duration::from_secs(90_061)),
            "1d 1h 1m 1s"
        );
    }

    #[tokio::test]
    async fn test_whoami_reports_tier() {
        let harness = Harness::new();
        assert!(harness.run(moderator(), "!whoami").await.is_success());
        let reply = embed(harness.reply());
        assert_eq!(reply.title, "mod");
        let tier = reply.fields.iter().find(|f| f.name == "Tier").unwrap();
        assert_eq!(tier.value, Capability::Moderator.to_string());
    }

    #[tokio::test]
    async fn test_help_lists_only_permitted_commands() {
        let harness = Harness::new();
        assert!(harness.run(user(), "!help").await.is_success());
        let reply = embed(harness.reply());
        let groups: Vec<_> = reply.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(groups, vec!["user"]);
        assert!(reply.fields[0].value.contains("`!roll`"));

        let harness = Harness::new();
        harness.run(owner(), "!help").await;
        let reply = embed(harness.reply());
        let groups: Vec<_> = reply.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(groups, vec!["owner", "user"]);
    }

    #[tokio::test]
    async fn test_help_for_one_command() {
        let harness = Harness::new();
        assert!(harness.run(user(), "!help !ban").await.is_success());
        let reply = embed(harness.reply());
        assert_eq!(reply.title, "!ban");
        let usage = reply.fields.iter().find(|f| f.name == "Usage").unwrap();
        assert!(usage.value.starts_with("`!ban <member>"));
    }

    #[tokio::test]
    async fn test_help_for_unknown_command() {
        let harness = Harness::new();
        let outcome = harness.run(user(), "!help nope").await;
        assert!(matches!(
            outcome,
            Outcome::ArgumentError { command: Some(ref c), .. } if c == "help"
        ));
    }

    #[test]
    fn test_dice_parsing() {
        assert_eq!("2d20".parse(), Ok(Dice { count: 2, sides: 20 }));
        assert_eq!("d6".parse(), Ok(Dice { count: 1, sides: 6 }));
        assert!("20".parse::<Dice>().is_err());
        assert!("0d6".parse::<Dice>().is_err());
        assert!("1d1".parse::<Dice>().is_err());
        assert!("xd6".parse::<Dice>().is_err());
    }

    #[tokio::test]
    async fn test_roll() {
        let harness = Harness::new();
        assert!(harness.run(user(), "!roll 3d4").await.is_success());
        let reply = embed(harness.reply());
        assert!(reply.description.contains("3d4"));

        let harness = Harness::new();
        assert!(matches!(
            harness.run(user(), "!roll banana").await,
            Outcome::ArgumentError { .. }
        ));
    }
}
