//! Configuration loading for the session server.
//!
//! The configuration lives in `awf-config.yaml` (or the file named by
//! `AWF_CONFIG`). Every field has a default, so a missing file yields a
//! runnable local setup. Environment variables override the file:
//!
//! | Variable | Overrides |
//! |----------|-----------|
//! | `PORT` | `server.port` |
//! | `AWF_HOST` | `server.host` |
//! | `AWF_CATALOG_PATH` | `catalog.path` |

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::server::ServerConfig;

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "awf-config.yaml";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An environment override could not be parsed.
    #[error("invalid value {value:?} for {name}: {reason}")]
    InvalidEnv {
        /// The environment variable name.
        name: &'static str,
        /// The rejected value.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level server configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// Listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Card catalog location.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file, falling back to defaults when
    /// the file does not exist, then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if an existing file cannot be read,
    /// [`ConfigError::Yaml`] if it is not valid YAML, or
    /// [`ConfigError::InvalidEnv`] for an unparsable override.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            serde_yml::from_str(&contents)?
        } else {
            tracing::info!(path = %path.display(), "config file not found, using defaults");
            Self::default()
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Parse configuration from a YAML string without environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] if `PORT` is not a valid port.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.server.port = port.parse().map_err(|e| ConfigError::InvalidEnv {
                name: "PORT",
                value: port.clone(),
                reason: format!("{e}"),
            })?;
        }
        if let Some(host) = lookup("AWF_HOST") {
            self.server.host = host;
        }
        if let Some(path) = lookup("AWF_CATALOG_PATH") {
            self.catalog.path = PathBuf::from(path);
        }
        Ok(())
    }
}

/// Card catalog settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogConfig {
    /// Path of the catalog JSON file.
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("public/data/MTGACards.json")
}

fn default_log_level() -> String {
    String::from("info")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn empty_yaml_gives_defaults() {
        let config = AppConfig::parse("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn parses_partial_file() {
        let yaml = "server:\n  port: 9000\ncatalog:\n  path: /srv/cards.json\n";
        let config = AppConfig::parse(yaml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.catalog.path, PathBuf::from("/srv/cards.json"));
    }

    #[test]
    fn env_overrides_win() {
        let env: HashMap<&str, &str> = [
            ("PORT", "5000"),
            ("AWF_HOST", "127.0.0.1"),
            ("AWF_CATALOG_PATH", "cards.json"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config
            .apply_overrides(|name| env.get(name).map(|value| (*value).to_owned()))
            .unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.catalog.path, PathBuf::from("cards.json"));
    }

    #[test]
    fn invalid_port_is_rejected() {
        let mut config = AppConfig::default();
        let err = config
            .apply_overrides(|name| (name == "PORT").then(|| String::from("eighty")))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { name: "PORT", .. }));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = AppConfig::load(Path::new("/nonexistent/awf-config.yaml")).unwrap();
        assert_eq!(config.catalog, CatalogConfig::default());
    }
}
