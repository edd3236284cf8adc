//! Configuration for the relay backend
//!
//! Defaults first, optionally overridden from a toml file or from
//! `CHIRP_*` environment variables, then validated.

use serde::{Deserialize, Serialize};
use std::env;

mod error;

pub use error::ConfigError;

/// Main relay configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelayConfig {
    /// The component's own identity on the network
    pub component: ComponentConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Metrics configuration
    pub metrics: MetricsConfig,
}

/// The component's network identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentConfig {
    /// Domain the component serves; logical users are addressable as
    /// `user@domain`
    pub domain: String,

    /// The component's own external address, used as the origin of
    /// self-originated presence and subscription traffic
    pub address: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable JSON formatting
    pub json_format: bool,

    /// Include timestamps
    pub with_timestamp: bool,

    /// Include target module
    pub with_target: bool,
}

/// Metrics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable metric descriptions on startup
    pub enabled: bool,
}

impl Default for ComponentConfig {
    fn default() -> Self {
        Self {
            domain: "chirp.localhost".to_string(),
            address: "relay@chirp.localhost".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            with_timestamp: true,
            with_target: true,
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl RelayConfig {
    /// Load configuration from environment variables over the defaults.
    ///
    /// Variables follow the pattern `CHIRP_<SECTION>_<KEY>`, e.g.
    /// `CHIRP_COMPONENT_DOMAIN=chirp.example.net`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(domain) = env::var("CHIRP_COMPONENT_DOMAIN") {
            config.component.domain = domain;
        }
        if let Ok(address) = env::var("CHIRP_COMPONENT_ADDRESS") {
            config.component.address = address;
        }
        if let Ok(level) = env::var("CHIRP_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Ok(json) = env::var("CHIRP_LOG_JSON") {
            config.logging.json_format = json
                .parse()
                .map_err(|e| ConfigError::InvalidValue(format!("Invalid JSON flag: {}", e)))?;
        }
        if let Ok(enabled) = env::var("CHIRP_METRICS_ENABLED") {
            config.metrics.enabled = enabled
                .parse()
                .map_err(|e| ConfigError::InvalidValue(format!("Invalid metrics flag: {}", e)))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a toml file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead(e.to_string()))?;

        let config: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a toml file
    pub fn save_to_file(&self, path: impl AsRef<std::path::Path>) -> Result<(), ConfigError> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;

        std::fs::write(path, contents).map_err(|e| ConfigError::FileWrite(e.to_string()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.component.domain.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "component domain must not be empty".to_string(),
            ));
        }
        if self.component.domain.contains('/') || self.component.domain.contains('@') {
            return Err(ConfigError::ValidationFailed(format!(
                "component domain must be bare, got: {}",
                self.component.domain
            )));
        }
        if self.component.address.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "component address must not be empty".to_string(),
            ));
        }
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::ValidationFailed(format!(
                "Invalid log level: {}",
                self.logging.level
            )));
        }
        Ok(())
    }
}
