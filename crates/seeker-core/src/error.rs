//! Error types shared across the workspace.

use thiserror::Error;

/// Rejection of operator mission input. Rejected input changes nothing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("coordinate `{field}` is not a number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("coordinate `{field}` must be finite")]
    NonFinite { field: &'static str },

    #[error("mission text is empty")]
    EmptyMissionText,
}

/// Configuration loading or validation failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
