//! Configuration error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read configuration file: {0}")]
    FileRead(String),

    #[error("Could not write configuration file: {0}")]
    FileWrite(String),

    #[error("Could not parse configuration: {0}")]
    Parse(String),

    #[error("Could not serialize configuration: {0}")]
    Serialize(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}
