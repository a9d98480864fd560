//! Invocation text parsing.
//!
//! Splitting happens in two stages. The dispatcher only separates the
//! command token from the raw argument remainder ([`split_invocation`]);
//! handlers that want structured arguments then shell-split that remainder
//! and feed it to clap ([`parse_args`]).

use clap::Parser;

use bradl_core::UserId;

use crate::error::{CommandError, CommandResult};

/// Strips the invocation prefix from `content`.
///
/// Accepts the literal `prefix`, or, when `bot` is given, a leading mention
/// of the bot (`<@id>` or `<@!id>`) followed by optional whitespace. Returns
/// the text after the prefix, or `None` if the message carries neither form.
/// An empty literal prefix never matches.
pub fn strip_prefix<'a>(content: &'a str, prefix: &str, bot: Option<UserId>) -> Option<&'a str> {
    if !prefix.is_empty()
        && let Some(rest) = content.strip_prefix(prefix)
    {
        return Some(rest);
    }

    let id = bot?.get().to_string();
    let rest = content.strip_prefix("<@")?;
    let rest = rest.strip_prefix('!').unwrap_or(rest);
    let rest = rest.strip_prefix(id.as_str())?.strip_prefix('>')?;
    Some(rest.trim_start())
}

/// Splits `input` into the command token and the raw argument remainder.
///
/// The first whitespace run is the delimiter; without whitespace the
/// arguments are empty.
pub fn split_invocation(input: &str) -> (&str, &str) {
    match input.find(char::is_whitespace) {
        Some(idx) => (&input[..idx], input[idx..].trim_start()),
        None => (input, ""),
    }
}

/// Shell-like argument splitting.
///
/// Handles whitespace separation, single and double quotes, and backslash
/// escapes inside double quotes.
pub fn shell_split(input: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut in_single_quote = false;
    let mut in_double_quote = false;
    let mut escape_next = false;

    for ch in input.chars() {
        if escape_next {
            current.push(ch);
            escape_next = false;
            continue;
        }

        match ch {
            '\\' if in_double_quote => escape_next = true,
            '\'' if !in_double_quote => {
                in_single_quote = !in_single_quote;
                in_token = true;
            }
            '"' if !in_single_quote => {
                in_double_quote = !in_double_quote;
                in_token = true;
            }
            c if c.is_whitespace() && !in_single_quote && !in_double_quote => {
                if in_token {
                    args.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            _ => {
                current.push(ch);
                in_token = true;
            }
        }
    }

    if in_token {
        args.push(current);
    }

    args
}

/// Parses `raw` arguments for command `name` with clap.
///
/// Clap errors (missing required arguments, bad values, `--help`) become
/// [`CommandError::Arguments`] carrying clap's rendered message.
pub fn parse_args<T: Parser>(name: &str, raw: &str) -> CommandResult<T> {
    let argv = std::iter::once(name.to_string()).chain(shell_split(raw));
    T::try_parse_from(argv).map_err(|err| CommandError::arguments(err.render().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_literal_prefix() {
        assert_eq!(strip_prefix("!ping", "!", None), Some("ping"));
        assert_eq!(strip_prefix("ping", "!", None), None);
        assert_eq!(strip_prefix(">>ban x", ">>", None), Some("ban x"));
    }

    #[test]
    fn test_empty_prefix_never_matches() {
        assert_eq!(strip_prefix("ping", "", None), None);
    }

    #[test]
    fn test_strip_mention_prefix() {
        let bot = Some(UserId(99));
        assert_eq!(strip_prefix("<@99> ping", "!", bot), Some("ping"));
        assert_eq!(strip_prefix("<@!99>   ping x", "!", bot), Some("ping x"));
        assert_eq!(strip_prefix("<@98> ping", "!", bot), None);
        assert_eq!(strip_prefix("<@999> ping", "!", bot), None);
        assert_eq!(strip_prefix("<@99> ping", "!", None), None);
    }

    #[test]
    fn test_split_invocation() {
        assert_eq!(split_invocation("ping"), ("ping", ""));
        assert_eq!(split_invocation("kick <@1> spam"), ("kick", "<@1> spam"));
        assert_eq!(split_invocation("say \t hello  world"), ("say", "hello  world"));
        assert_eq!(split_invocation(""), ("", ""));
    }

    #[test]
    fn test_shell_split_quotes() {
        assert_eq!(
            shell_split(r#"<@1> "being rude" 'very rude'"#),
            vec!["<@1>", "being rude", "very rude"]
        );
        assert_eq!(shell_split(r#""say \"hi\"""#), vec![r#"say "hi""#]);
    }

    #[test]
    fn test_shell_split_keeps_empty_quoted() {
        assert_eq!(shell_split(r#"a "" b"#), vec!["a", "", "b"]);
        assert!(shell_split("  \n\t ").is_empty());
    }

    #[derive(Parser, Debug)]
    struct BanArgs {
        target: UserId,
        #[arg(long, default_value_t = 0)]
        days: u8,
        reason: Vec<String>,
    }

    #[test]
    fn test_parse_args_success() {
        let args: BanArgs = parse_args("ban", "<@42> --days 2 spamming links").unwrap();
        assert_eq!(args.target, UserId(42));
        assert_eq!(args.days, 2);
        assert_eq!(args.reason.join(" "), "spamming links");
    }

    #[test]
    fn test_parse_args_missing_target() {
        let err = parse_args::<BanArgs>("ban", "").unwrap_err();
        match err {
            CommandError::Arguments { detail } => assert!(detail.contains("<TARGET>")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_args_bad_mention() {
        assert!(matches!(
            parse_args::<BanArgs>("ban", "@someone"),
            Err(CommandError::Arguments { .. })
        ));
    }
}
