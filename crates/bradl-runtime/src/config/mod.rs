//! Configuration module for the BradlBot runtime.
//!
//! The bot reads a single JSON file (`config.json` by default) layered under
//! `BRADL_*` environment variables. If the file does not exist yet, the
//! [`bootstrap`] module asks for the two required values on the terminal and
//! writes it.

pub mod bootstrap;
pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use bootstrap::{ensure_config, prompt_config, write_config};
pub use error::{ConfigError, ConfigResult};
pub use loader::{CONFIG_FILE_NAME, ConfigLoader, load_config, load_config_from_file};
pub use schema::{
    BotConfig, LogFormat, LogLevel, LogOutput, LoggingConfig, SpanEventConfig, UnknownCommand,
};
pub use validation::validate_config;
