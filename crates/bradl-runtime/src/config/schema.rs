//! Configuration schema definitions.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use bradl_core::UserId;
use bradl_framework::{DispatchOptions, UnknownCommandPolicy};

/// Root configuration record, as stored in `config.json`.
///
/// Only `token` and `prefix` are written by the bootstrap prompt; every other
/// field has a default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Gateway login token.
    #[serde(default)]
    pub token: String,

    /// Literal command prefix.
    #[serde(default)]
    pub prefix: String,

    /// The bot owner's user id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<UserId>,

    /// Answer to prefixed messages naming no registered command.
    #[serde(default)]
    pub unknown_command: UnknownCommand,

    /// Execution budget per command invocation, in seconds.
    #[serde(default = "default_handler_timeout_secs")]
    pub handler_timeout_secs: u64,

    /// Accept `@bot command` as an invocation.
    #[serde(default = "default_true")]
    pub mention_prefix: bool,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            prefix: String::new(),
            owner_id: None,
            unknown_command: UnknownCommand::default(),
            handler_timeout_secs: default_handler_timeout_secs(),
            mention_prefix: true,
            logging: LoggingConfig::default(),
        }
    }
}

impl BotConfig {
    /// A record holding just the two bootstrap values.
    pub fn new(token: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            prefix: prefix.into(),
            ..Default::default()
        }
    }

    pub fn handler_timeout(&self) -> Duration {
        Duration::from_secs(self.handler_timeout_secs)
    }

    /// Dispatcher settings derived from this record.
    pub fn dispatch_options(&self) -> DispatchOptions {
        DispatchOptions {
            prefix: self.prefix.clone(),
            mention_prefix: self.mention_prefix,
            owner: self.owner_id,
            unknown_command: self.unknown_command.into(),
            handler_timeout: self.handler_timeout(),
        }
    }
}

fn default_handler_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

/// Serialized form of [`UnknownCommandPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownCommand {
    #[default]
    Ignore,
    Respond,
}

impl From<UnknownCommand> for UnknownCommandPolicy {
    fn from(value: UnknownCommand) -> Self {
        match value {
            UnknownCommand::Ignore => Self::Ignore,
            UnknownCommand::Respond => Self::Respond,
        }
    }
}

/// Log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log line layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Full,
    Pretty,
    #[cfg(feature = "json-log")]
    Json,
}

/// Log destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    Stderr,
    File,
}

/// Which span lifecycle events are logged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpanEventConfig {
    #[serde(default)]
    pub new: bool,
    #[serde(default)]
    pub enter: bool,
    #[serde(default)]
    pub exit: bool,
    #[serde(default)]
    pub close: bool,
}

/// The `logging` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,

    #[serde(default)]
    pub format: LogFormat,

    #[serde(default)]
    pub output: LogOutput,

    /// Target file when `output` is `file`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,

    #[serde(default)]
    pub span_events: SpanEventConfig,

    #[serde(default)]
    pub thread_ids: bool,

    /// Include file names and line numbers.
    #[serde(default)]
    pub file_location: bool,

    /// Per-target level overrides, e.g. `{"bradl_framework": "debug"}`.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub filters: HashMap<String, LogLevel>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_record_parses() {
        let config: BotConfig =
            serde_json::from_str(r#"{"token": "abc", "prefix": "!"}"#).unwrap();
        assert_eq!(config.token, "abc");
        assert_eq!(config.prefix, "!");
        assert_eq!(config.owner_id, None);
        assert_eq!(config.unknown_command, UnknownCommand::Ignore);
        assert_eq!(config.handler_timeout(), Duration::from_secs(30));
        assert!(config.mention_prefix);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn test_bootstrap_record_serializes_compactly() {
        let json = serde_json::to_value(BotConfig::new("abc", ">>")).unwrap();
        assert_eq!(json["token"], "abc");
        assert_eq!(json["prefix"], ">>");
        assert!(json.get("owner_id").is_none());
    }

    #[test]
    fn test_dispatch_options() {
        let config: BotConfig = serde_json::from_str(
            r#"{
                "token": "abc",
                "prefix": "?",
                "owner_id": 42,
                "unknown_command": "respond",
                "handler_timeout_secs": 5
            }"#,
        )
        .unwrap();
        let options = config.dispatch_options();
        assert_eq!(options.prefix, "?");
        assert_eq!(options.owner, Some(UserId(42)));
        assert_eq!(options.unknown_command, UnknownCommandPolicy::Respond);
        assert_eq!(options.handler_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_logging_table() {
        let config: LoggingConfig = serde_json::from_str(
            r#"{"level": "debug", "format": "pretty", "output": "stderr",
                "filters": {"bradl_framework": "trace"}}"#,
        )
        .unwrap();
        assert_eq!(config.level.to_tracing_level(), tracing::Level::DEBUG);
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.output, LogOutput::Stderr);
        assert_eq!(config.filters["bradl_framework"], LogLevel::Trace);
    }
}
