//! Session lifecycle configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Inactivity after which a session is discarded
    #[serde(default = "default_timeout_minutes")]
    pub timeout_minutes: u64,

    /// Seconds between background prune sweeps
    #[serde(default = "default_prune_interval")]
    pub prune_interval_secs: u64,
}

impl SessionConfig {
    pub fn timeout(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.timeout_minutes as i64)
    }

    pub fn prune_interval(&self) -> Duration {
        Duration::from_secs(self.prune_interval_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_minutes == 0 || self.timeout_minutes > 24 * 60 {
            return Err(ValidationError::InvalidSessionTimeout);
        }
        if self.prune_interval_secs == 0 {
            return Err(ValidationError::InvalidPruneInterval);
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout_minutes: default_timeout_minutes(),
            prune_interval_secs: default_prune_interval(),
        }
    }
}

fn default_timeout_minutes() -> u64 {
    30
}

fn default_prune_interval() -> u64 {
    60
}
