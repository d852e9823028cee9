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

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid socket address: {0}")]
    InvalidSocketAddr(String),

    #[error("Session timeout must be positive")]
    InvalidSessionTimeout,

    #[error("Prune interval must be positive")]
    InvalidPruneInterval,

    #[error("Vision endpoint must be an http(s) URL")]
    InvalidVisionEndpoint,

    #[error("Fee rate must be below 100 percent")]
    InvalidFeeRate,

    #[error("Vision retries must be at most {0}")]
    InvalidRetryCount(u32),

    #[error("Report UTC offset must be within a day")]
    InvalidUtcOffset,
}
