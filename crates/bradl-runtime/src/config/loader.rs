//! Configuration loader using figment.
//!
//! # Configuration Priority (lowest to highest)
//!
//! 1. Built-in defaults
//! 2. `config.json` (explicit path, or the first one found on the search path)
//! 3. Environment variables (`BRADL_*`)
//! 4. Programmatic overrides
//!
//! # Environment Variable Mapping
//!
//! Environment variables are mapped using the `BRADL_` prefix with `__` as separator:
//!
//! - `BRADL_TOKEN=xxx` → `token = "xxx"`
//! - `BRADL_HANDLER_TIMEOUT_SECS=60` → `handler_timeout_secs = 60`
//! - `BRADL_LOGGING__LEVEL=debug` → `logging.level = "debug"`
//!
//! # Example
//!
//! ```rust,ignore
//! use bradl_runtime::config::ConfigLoader;
//!
//! let config = ConfigLoader::new()
//!     .file("./config.json")
//!     .load()?;
//! ```

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized};
use tracing::{debug, info, trace, warn};

use super::error::{ConfigError, ConfigResult};
use super::schema::BotConfig;
use super::validation::validate_config;

/// File name searched for on the search path.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Default prefix of environment overrides.
pub const ENV_PREFIX: &str = "BRADL_";

/// Configuration loader with figment-based multi-source support.
pub struct ConfigLoader {
    figment: Figment,
    search_paths: Vec<PathBuf>,
    load_env: bool,
    env_prefix: String,
    /// Specific config file to load (overrides search).
    config_file: Option<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            figment: Figment::new(),
            search_paths: Vec::new(),
            load_env: true,
            env_prefix: ENV_PREFIX.to_string(),
            config_file: None,
        }
    }

    /// Adds a directory searched for `config.json`.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    pub fn with_current_dir(self) -> Self {
        match std::env::current_dir() {
            Ok(cwd) => self.search_path(cwd),
            Err(_) => self,
        }
    }

    pub fn with_user_config_dir(self) -> Self {
        match user_config_dir() {
            Some(dir) => self.search_path(dir),
            None => self,
        }
    }

    /// Sets a specific configuration file to load.
    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enables loading environment variables (default: true).
    pub fn with_env(mut self) -> Self {
        self.load_env = true;
        self
    }

    pub fn without_env(mut self) -> Self {
        self.load_env = false;
        self
    }

    /// Replaces the `BRADL_` environment prefix.
    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Merges configuration programmatically, above every other source.
    pub fn merge(mut self, config: BotConfig) -> Self {
        self.figment = self.figment.merge(Serialized::defaults(config));
        self
    }

    /// The file that [`load`](Self::load) would read, if any.
    pub fn locate(&self) -> Option<PathBuf> {
        if let Some(path) = &self.config_file {
            return path.exists().then(|| path.clone());
        }
        self.resolve_search_paths()
            .into_iter()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .find(|path| path.exists())
    }

    /// Loads, validates and returns the configuration.
    pub fn load(self) -> ConfigResult<BotConfig> {
        let figment = self.build_figment()?;
        let config: BotConfig = figment.extract()?;
        validate_config(&config)?;

        debug!(
            prefix = %config.prefix,
            logging_level = %config.logging.level,
            unknown_command = ?config.unknown_command,
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    fn build_figment(mut self) -> ConfigResult<Figment> {
        let mut figment = Figment::from(Serialized::defaults(BotConfig::default()));

        match &self.config_file {
            Some(path) if path.exists() => {
                info!(path = %path.display(), "Loading configuration file");
                figment = figment.merge(Json::file(path));
            }
            Some(path) => return Err(ConfigError::FileNotFound(path.clone())),
            None => match self.locate() {
                Some(path) => {
                    info!(path = %path.display(), "Loading configuration file");
                    figment = figment.merge(Json::file(path));
                }
                None => warn!("No configuration file found, using defaults"),
            },
        }

        if self.load_env {
            trace!(prefix = %self.env_prefix, "Loading environment variables");
            figment = figment.merge(Env::prefixed(&self.env_prefix).split("__"));
        }

        let overrides = std::mem::take(&mut self.figment);
        Ok(figment.merge(overrides))
    }

    fn resolve_search_paths(&self) -> Vec<PathBuf> {
        if !self.search_paths.is_empty() {
            return self.search_paths.clone();
        }
        let mut paths = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd);
        }
        if let Some(dir) = user_config_dir() {
            paths.push(dir);
        }
        paths
    }
}

/// Per-user config directory (`~/.config/bradlbot` on Linux).
pub fn user_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("bradlbot"))
}

/// Loads from the default search path with environment overrides.
pub fn load_config() -> ConfigResult<BotConfig> {
    ConfigLoader::new().load()
}

/// Loads a specific file with environment overrides.
pub fn load_config_from_file<P: AsRef<Path>>(path: P) -> ConfigResult<BotConfig> {
    ConfigLoader::new().file(path).load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{LogLevel, UnknownCommand};

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("bradl-loader-{}-{name}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write(dir: &Path, contents: &str) -> PathBuf {
        let path = dir.join(CONFIG_FILE_NAME);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = temp_dir("explicit");
        let path = write(&dir, r#"{"token": "abc", "prefix": "?"}"#);

        let config = ConfigLoader::new().without_env().file(&path).load().unwrap();
        assert_eq!(config.token, "abc");
        assert_eq!(config.prefix, "?");
        assert_eq!(config.handler_timeout_secs, 30);
    }

    #[test]
    fn test_missing_explicit_file() {
        let path = temp_dir("missing").join("nope.json");
        let err = ConfigLoader::new().without_env().file(&path).load().unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(p) if p == path));
    }

    #[test]
    fn test_search_path_lookup() {
        let empty = temp_dir("search-empty");
        let dir = temp_dir("search-hit");
        write(&dir, r#"{"token": "abc", "prefix": "!"}"#);

        let loader = ConfigLoader::new().search_path(&empty).search_path(&dir);
        assert_eq!(loader.locate(), Some(dir.join(CONFIG_FILE_NAME)));
        assert!(loader.without_env().load().is_ok());
    }

    #[test]
    fn test_empty_token_fails_validation() {
        let dir = temp_dir("empty-token");
        let path = write(&dir, r#"{"token": "", "prefix": "!"}"#);
        let err = ConfigLoader::new().without_env().file(&path).load().unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn test_malformed_file() {
        let dir = temp_dir("malformed");
        let path = write(&dir, r#"{"token": "abc", "prefix": "!", "owner_id": "me"}"#);
        let err = ConfigLoader::new().without_env().file(&path).load().unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = temp_dir("env");
        let path = write(&dir, r#"{"token": "abc", "prefix": "!"}"#);

        // SAFETY: these variables use a prefix no other test reads.
        unsafe {
            std::env::set_var("BRADLTEST_ENV_PREFIX", ">>");
            std::env::set_var("BRADLTEST_ENV_UNKNOWN_COMMAND", "respond");
            std::env::set_var("BRADLTEST_ENV_LOGGING__LEVEL", "debug");
        }
        let config = ConfigLoader::new()
            .env_prefix("BRADLTEST_ENV_")
            .file(&path)
            .load()
            .unwrap();
        unsafe {
            std::env::remove_var("BRADLTEST_ENV_PREFIX");
            std::env::remove_var("BRADLTEST_ENV_UNKNOWN_COMMAND");
            std::env::remove_var("BRADLTEST_ENV_LOGGING__LEVEL");
        }

        assert_eq!(config.token, "abc");
        assert_eq!(config.prefix, ">>");
        assert_eq!(config.unknown_command, UnknownCommand::Respond);
        assert_eq!(config.logging.level, LogLevel::Debug);
    }

    #[test]
    fn test_programmatic_merge_wins() {
        let dir = temp_dir("merge");
        let path = write(&dir, r#"{"token": "abc", "prefix": "!"}"#);
        let config = ConfigLoader::new()
            .without_env()
            .file(&path)
            .merge(BotConfig::new("override", "$"))
            .load()
            .unwrap();
        assert_eq!(config.token, "override");
        assert_eq!(config.prefix, "$");
    }
}
