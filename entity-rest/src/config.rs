//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. Environment variables (prefix: ENTITY_REST_, `__` separates nested keys)
//! 2. Current working directory: ./config.toml
//! 3. System directory: /etc/entity-rest/config.toml
//! 4. Default values
//!
//! ```toml
//! [service]
//! name = "customers"
//! port = 8080
//!
//! [resource]
//! max_page_size = 50
//! ```

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;
use crate::pagination::DEFAULT_MAX_PAGE_SIZE;

const ENV_PREFIX: &str = "ENTITY_REST_";
const SYSTEM_CONFIG_PATH: &str = "/etc/entity-rest/config.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Service configuration
    #[serde(default)]
    pub service: ServiceConfig,

    /// Resource handler configuration
    #[serde(default)]
    pub resource: ResourceConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name
    #[serde(default = "default_name")]
    pub name: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum request body size in kilobytes
    #[serde(default = "default_body_limit_kb")]
    pub body_limit_kb: usize,
}

impl ServiceConfig {
    /// Request timeout as a duration
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Body limit in bytes
    #[must_use]
    pub fn body_limit_bytes(&self) -> usize {
        self.body_limit_kb.saturating_mul(1024)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            port: default_port(),
            log_level: default_log_level(),
            timeout_secs: default_timeout(),
            body_limit_kb: default_body_limit_kb(),
        }
    }
}

/// Resource handler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Maximum number of entities per list page; values below 1 act as 1
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            max_page_size: default_max_page_size(),
        }
    }
}

fn default_name() -> String {
    "entity-rest".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_body_limit_kb() -> usize {
    1024
}

fn default_max_page_size() -> usize {
    DEFAULT_MAX_PAGE_SIZE
}

impl Config {
    /// Load configuration from all sources
    ///
    /// Config files are merged lowest priority first, so `./config.toml`
    /// overrides `/etc/entity-rest/config.toml`. Environment variables
    /// (ENTITY_REST_ prefix) override all file-based configs.
    pub fn load() -> Result<Self> {
        let config_paths = Self::find_config_paths();

        tracing::debug!("Searching for config files in order:");
        for path in &config_paths {
            tracing::debug!("  - {}", path.display());
        }

        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        for path in config_paths.iter().rev() {
            if path.exists() {
                tracing::info!("Loading configuration from: {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
        }

        let config = figment.merge(Self::env()).extract()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// Useful for testing or non-standard deployments. A missing file is
    /// treated as empty.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Self::env())
            .extract()?;

        Ok(config)
    }

    fn env() -> Env {
        Env::prefixed(ENV_PREFIX).split("__")
    }

    /// Config file paths, highest priority first
    fn find_config_paths() -> Vec<PathBuf> {
        vec![
            PathBuf::from("config.toml"),
            PathBuf::from(SYSTEM_CONFIG_PATH),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service.port, 8080);
        assert_eq!(config.service.log_level, "info");
        assert_eq!(config.service.timeout(), Duration::from_secs(30));
        assert_eq!(config.service.body_limit_bytes(), 1024 * 1024);
        assert_eq!(config.resource.max_page_size, 20);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[service]\nname = \"customers\"\nport = 9090\n\n[resource]\nmax_page_size = 3"
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.service.name, "customers");
        assert_eq!(config.service.port, 9090);
        assert_eq!(config.service.log_level, "info");
        assert_eq!(config.resource.max_page_size, 3);
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.service.name, "entity-rest");
        assert_eq!(config.resource.max_page_size, 20);
    }

    #[test]
    fn test_invalid_value_is_an_error() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[service]\nport = \"not a port\"").unwrap();
        assert!(Config::load_from(file.path()).is_err());
    }

    #[test]
    fn test_env_override() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[resource]\nmax_page_size = 5")?;
            jail.set_env("ENTITY_REST_RESOURCE__MAX_PAGE_SIZE", "7");
            jail.set_env("ENTITY_REST_SERVICE__LOG_LEVEL", "debug");

            let config = Config::load().map_err(|e| e.to_string())?;
            assert_eq!(config.resource.max_page_size, 7);
            assert_eq!(config.service.log_level, "debug");
            Ok(())
        });
    }
}
