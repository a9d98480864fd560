//! BradlBot
//!
//! Runs the bot against an interactive console session: every line typed on
//! stdin is a message from the operator in the `console` guild, and replies
//! are printed to stdout.
//!
//! # Usage
//!
//! ```bash
//! cargo run --package bradlbot -- --config config.json
//! ```
//!
//! On first start the bot asks for a command prefix and a token and writes
//! them to the configuration file.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::error;

use bradl::runtime::config::{CONFIG_FILE_NAME, ensure_config};
use bradl::runtime::{BotRuntime, ConfigLoader, LoggingGuard, RuntimeResult, logging};
use bradl::transport::ConsoleTransport;

#[derive(Parser, Debug)]
#[command(name = "bradlbot", version, about = "A permission-tiered chat command bot")]
struct Cli {
    /// Path of the configuration file; created on first start.
    #[arg(short, long, default_value = CONFIG_FILE_NAME)]
    config: PathBuf,

    /// Exit immediately after a startup failure instead of waiting for Enter.
    #[arg(long)]
    no_pause: bool,
}

async fn start(cli: &Cli, logging_guard: &mut Option<LoggingGuard>) -> RuntimeResult<()> {
    ensure_config(&cli.config, io::stdin().lock(), io::stdout())?;

    let config = ConfigLoader::new().file(&cli.config).load()?;
    *logging_guard = Some(logging::init_from_config(&config.logging));

    let runtime = BotRuntime::builder()
        .config(config)
        .groups(bradl::commands::groups())
        .transport(Arc::new(ConsoleTransport::stdio()))
        .build()?;
    runtime.run().await
}

fn pause() {
    print!("Press any key to quit...");
    let _ = io::stdout().flush();
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    println!("BradlBot Starting");

    let mut logging_guard = None;
    let result = start(&cli, &mut logging_guard).await;

    let Err(err) = result else {
        return Ok(());
    };

    if logging_guard.is_some() {
        error!(target: "BradlBot", "Error with config or runtime error: {} - {}", err.kind(), err);
    } else {
        eprintln!("Error with config or runtime error: {} - {}", err.kind(), err);
    }

    if !cli.no_pause {
        pause();
    }
    drop(logging_guard);

    if cfg!(debug_assertions) {
        return Err(err.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["bradlbot"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("config.json"));
        assert!(!cli.no_pause);
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from(["bradlbot", "-c", "/tmp/bot.json", "--no-pause"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("/tmp/bot.json"));
        assert!(cli.no_pause);
    }
}
