use std::env;

use thiserror::Error;
use tracing::warn;

use super::models::Config;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("unterminated ${{...}} placeholder at byte {0}")]
    UnterminatedPlaceholder(usize),
}

pub fn load_config(path: &str) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> Result<Config, ConfigError> {
    let expanded = substitute_env_vars(contents)?;
    let config: Config = serde_yaml::from_str(&expanded)?;
    Ok(config)
}

/// Replaces every `${NAME}` with the value of the environment variable
/// `NAME`. Unset variables expand to an empty string.
pub fn substitute_env_vars(contents: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(contents.len());
    let mut rest = contents;
    let mut offset = 0;

    while let Some(start) = rest.find("${") {
        output.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find('}')
            .ok_or(ConfigError::UnterminatedPlaceholder(offset + start))?;
        let name = after[..end].trim();
        match env::var(name) {
            Ok(value) => output.push_str(&value),
            Err(_) => warn!("Environment variable {} is not set, using empty value", name),
        }
        let consumed = start + 2 + end + 1;
        offset += consumed;
        rest = &rest[consumed..];
    }
    output.push_str(rest);

    Ok(output)
}

/// Process-level overrides that win over the file.
pub fn apply_env_overrides(config: &mut Config) {
    if let Ok(port) = env::var("PORT") {
        match port.parse() {
            Ok(port) => config.general.port = port,
            Err(_) => warn!("Ignoring invalid PORT value '{}'", port),
        }
    }
    if let Ok(url) = env::var("DATABASE_URL") {
        config.database.url = url;
    }
}
