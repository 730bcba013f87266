use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Prefix for environment variable overrides (e.g. `TICKETDESK_SERVER_PORT`,
/// `TICKETDESK_STORAGE_CREATE_PARENT_DIRS`).
const ENV_PREFIX: &str = "TICKETDESK_";

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    Figment::new()
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from file, falling back to built-in defaults
/// (still honoring environment overrides) when the file does not exist.
pub fn load_config_or_default(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        return load_config(path);
    }

    Figment::from(Serialized::defaults(Config::default()))
        .merge(env_provider())
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

fn env_provider() -> Env {
    // TICKETDESK_CONFIG names the file itself, not a setting. Only the first
    // underscore separates section from key; keys may contain underscores.
    Env::prefixed(ENV_PREFIX)
        .ignore(&["CONFIG"])
        .map(|key| key.as_str().replacen('_', ".", 1).into())
}
