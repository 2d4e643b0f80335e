//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::assets::directory::{StaticConfigError, StaticDirectory};
use crate::config::schema::BoundaryConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
    Static(StaticConfigError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
            ConfigError::Static(e) => write!(f, "Static mount error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<StaticConfigError> for ConfigError {
    fn from(e: StaticConfigError) -> Self {
        ConfigError::Static(e)
    }
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<BoundaryConfig, ConfigError> {
    let config: BoundaryConfig = toml::from_str(content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<BoundaryConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&content)
}

/// Materialize every configured static mount, checking the directories.
pub fn build_static_mounts(config: &BoundaryConfig) -> Result<Vec<StaticDirectory>, ConfigError> {
    config
        .static_mounts
        .iter()
        .map(|mount| StaticDirectory::from_config(mount).map_err(ConfigError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_document() {
        let config = parse_config(
            r#"
            [listener]
            bind_address = "127.0.0.1:9000"

            [limits]
            max_request_body_bytes = 1024

            [[static_mounts]]
            directory = "public"
            url_path = "/assets"
            cache_max_age = 86400

            [observability]
            log_level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
        assert_eq!(config.limits.max_request_body_bytes, Some(1024));
        assert_eq!(config.static_mounts.len(), 1);
        assert_eq!(config.static_mounts[0].cache_max_age, 86400);
        assert_eq!(config.timeouts.request_secs, 30);
        assert_eq!(config.observability.log_level, "debug");
    }

    #[test]
    fn mount_defaults() {
        let config = parse_config("[[static_mounts]]\ndirectory = \"public\"\n").unwrap();
        assert_eq!(config.static_mounts[0].url_path, "/static");
        assert_eq!(config.static_mounts[0].cache_max_age, 3600);
    }

    #[test]
    fn validation_errors_are_joined() {
        let err = parse_config(
            "[[static_mounts]]\ndirectory = \"a\"\nurl_path = \"nope\"\ncache_max_age = -5\n",
        )
        .unwrap_err();

        let message = err.to_string();
        assert!(message.starts_with("Validation failed: "));
        assert!(message.contains("must start with '/'"));
        assert!(message.contains(", "));
    }

    #[test]
    fn syntax_errors_are_parse_errors() {
        assert!(matches!(parse_config("[listener"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_directory_fails_when_mounting() {
        let config = parse_config(
            "[[static_mounts]]\ndirectory = \"/definitely/not/here\"\n",
        )
        .unwrap();

        assert!(matches!(build_static_mounts(&config), Err(ConfigError::Static(_))));
    }
}
