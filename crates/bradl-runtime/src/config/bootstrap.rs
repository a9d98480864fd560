//! First-run bootstrap.
//!
//! When no configuration file exists the operator is asked for the command
//! prefix and the token, and the answers are written as a JSON record before
//! loading proceeds.

use std::fs;
use std::io::{BufRead, Write};
use std::path::Path;

use tracing::info;

use super::error::{ConfigError, ConfigResult};
use super::schema::BotConfig;

pub const PREFIX_QUESTION: &str = "What do you want your command prefix to be?";
pub const TOKEN_QUESTION: &str = "What do you want your token to be?";

/// Asks for the prefix, then the token, on `output` and reads the answers
/// from `input`.
pub fn prompt_config<R: BufRead, W: Write>(mut input: R, mut output: W) -> ConfigResult<BotConfig> {
    let prefix = ask(&mut input, &mut output, PREFIX_QUESTION)?;
    let token = ask(&mut input, &mut output, TOKEN_QUESTION)?;
    Ok(BotConfig::new(token, prefix))
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> ConfigResult<String> {
    writeln!(output, "{question}")?;
    output.flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        return Err(ConfigError::Io(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "input closed before the configuration was complete",
        )));
    }
    Ok(answer.trim_end_matches(['\r', '\n']).to_string())
}

/// Writes `config` to `path` as pretty-printed JSON, creating parent
/// directories as needed.
pub fn write_config(path: &Path, config: &BotConfig) -> ConfigResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)?;
    info!(path = %path.display(), "Wrote configuration file");
    Ok(())
}

/// Makes sure a configuration file exists at `path`, prompting for one
/// otherwise. Returns `true` if the file was created.
pub fn ensure_config<R: BufRead, W: Write>(path: &Path, input: R, output: W) -> ConfigResult<bool> {
    if path.exists() {
        return Ok(false);
    }
    let config = prompt_config(input, output)?;
    write_config(path, &config)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;

    #[test]
    fn test_prompt_order_and_answers() {
        let mut output = Vec::new();
        let config = prompt_config("!\r\nsecret-token\n".as_bytes(), &mut output).unwrap();
        assert_eq!(config.prefix, "!");
        assert_eq!(config.token, "secret-token");

        let shown = String::from_utf8(output).unwrap();
        assert_eq!(shown, format!("{PREFIX_QUESTION}\n{TOKEN_QUESTION}\n"));
    }

    #[test]
    fn test_prompt_eof() {
        let err = prompt_config("!\n".as_bytes(), std::io::sink()).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_ensure_writes_then_loads() {
        let dir = std::env::temp_dir().join(format!("bradl-bootstrap-{}", std::process::id()));
        let path = dir.join("nested").join("config.json");
        let _ = fs::remove_file(&path);

        let created = ensure_config(&path, "?\nabc\n".as_bytes(), std::io::sink()).unwrap();
        assert!(created);

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["prefix"], "?");
        assert_eq!(written["token"], "abc");

        // Present now, so nothing is asked.
        assert!(!ensure_config(&path, "".as_bytes(), std::io::sink()).unwrap());

        let config = ConfigLoader::new().without_env().file(&path).load().unwrap();
        assert_eq!(config.prefix, "?");
        assert_eq!(config.token, "abc");
    }
}
