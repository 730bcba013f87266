use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Storage path names a file
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    let path = &config.storage.path;
    if path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "storage.path cannot be empty".to_string(),
        ));
    }

    let raw = path.to_string_lossy();
    if raw.ends_with('/') || raw.ends_with(std::path::MAIN_SEPARATOR) || path.file_name().is_none()
    {
        return Err(ConfigError::ValidationError(format!(
            "storage.path must name a file, got {:?}",
            path
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ServerConfig, StorageConfig};
    use std::path::PathBuf;

    fn config_with_path(path: &str) -> Config {
        Config {
            server: ServerConfig::default(),
            storage: StorageConfig {
                path: PathBuf::from(path),
                create_parent_dirs: true,
            },
        }
    }

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let mut config = Config::default();
        config.server.port = 0;
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_nested_path_ok() {
        assert!(validate_config(&config_with_path("/data/tickets.json")).is_ok());
    }

    #[test]
    fn test_validate_empty_path_fails() {
        let result = validate_config(&config_with_path(""));
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_directory_path_fails() {
        let result = validate_config(&config_with_path("/data/"));
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));

        let result = validate_config(&config_with_path(".."));
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }
}
