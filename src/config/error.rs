//! Configuration error types.

use thiserror::Error;

/// Configuration loading error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read env file: {0}")]
    ReadFile(#[from] std::io::Error),
    #[error("failed to parse key catalog: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(key: &str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}
