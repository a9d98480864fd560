//! Configuration validation.

use super::error::{ConfigError, ConfigResult};
use super::schema::{BotConfig, LogOutput, LoggingConfig};

/// Validates a loaded configuration record.
pub fn validate_config(config: &BotConfig) -> ConfigResult<()> {
    if config.token.trim().is_empty() {
        return Err(ConfigError::validation("token must not be empty"));
    }

    if config.prefix.is_empty() {
        return Err(ConfigError::validation("prefix must not be empty"));
    }
    if config.prefix.chars().any(char::is_whitespace) {
        return Err(ConfigError::validation(format!(
            "prefix must not contain whitespace: {:?}",
            config.prefix
        )));
    }

    if config.handler_timeout_secs == 0 {
        return Err(ConfigError::validation(
            "handler_timeout_secs must be greater than 0",
        ));
    }

    validate_logging_config(&config.logging)
}

fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::validation(
            "logging.file_path is required when logging.output is \"file\"",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        assert!(validate_config(&BotConfig::new("abc", "!")).is_ok());
    }

    #[test]
    fn test_empty_token_rejected() {
        let err = validate_config(&BotConfig::new("  ", "!")).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
        assert!(err.to_string().contains("token"));
    }

    #[test]
    fn test_bad_prefix_rejected() {
        assert!(validate_config(&BotConfig::new("abc", "")).is_err());
        assert!(validate_config(&BotConfig::new("abc", "! ")).is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = BotConfig {
            handler_timeout_secs: 0,
            ..BotConfig::new("abc", "!")
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_file_output_needs_path() {
        let mut config = BotConfig::new("abc", "!");
        config.logging.output = LogOutput::File;
        assert!(validate_config(&config).is_err());
        config.logging.file_path = Some("bradlbot.log".into());
        assert!(validate_config(&config).is_ok());
    }
}
