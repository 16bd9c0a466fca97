//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Membership number must be positive")]
    InvalidMembershipNumber,

    #[error("Signing key is set but empty")]
    EmptySigningKey,

    #[error("Prompt limit must be positive")]
    InvalidPromptLimit,

    #[error("Invalid log filter: {0}")]
    InvalidLogFilter(String),
}
