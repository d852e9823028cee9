//! Vision collaborator configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Most retries a deployment may configure.
pub const MAX_RETRIES: u32 = 5;

/// Vision analyzer configuration.
///
/// Without an endpoint the service runs against the mock analyzer, which
/// is only allowed outside production.
#[derive(Debug, Clone, Deserialize)]
pub struct VisionConfig {
    /// Base URL of the image analysis service
    pub endpoint: Option<String>,

    /// Bearer token for the service
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Retries on transient failures
    #[serde(default = "default_retries")]
    pub max_retries: u32,
}

impl VisionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if an external endpoint is configured
    pub fn has_endpoint(&self) -> bool {
        self.endpoint.as_ref().is_some_and(|e| !e.is_empty())
    }

    pub fn validate(&self, production: bool) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.max_retries > MAX_RETRIES {
            return Err(ValidationError::InvalidRetryCount(MAX_RETRIES));
        }
        match self.endpoint.as_deref() {
            Some(url) if !url.starts_with("http://") && !url.starts_with("https://") => {
                Err(ValidationError::InvalidVisionEndpoint)
            }
            Some(_) if self.api_key.as_ref().map_or(true, |k| k.is_empty()) => {
                Err(ValidationError::MissingRequired("VISION__API_KEY"))
            }
            None if production => Err(ValidationError::MissingRequired("VISION__ENDPOINT")),
            _ => Ok(()),
        }
    }
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
        }
    }
}

fn default_timeout() -> u64 {
    60
}

fn default_retries() -> u32 {
    2
}
