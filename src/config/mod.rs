//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables use the `LISTING_INTAKE` prefix
//! and `__` between nested keys. Every section has defaults, so an empty
//! environment yields a runnable development configuration.
//!
//! # Example
//!
//! ```no_run
//! use listing_intake::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod error;
mod pricing;
mod report;
mod server;
mod session;
mod vision;

pub use error::{ConfigError, ValidationError};
pub use pricing::PricingConfig;
pub use report::ReportConfig;
pub use server::{Environment, ServerConfig};
pub use session::SessionConfig;
pub use vision::VisionConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// Session timeout and prune cadence
    #[serde(default)]
    pub session: SessionConfig,

    /// Vision analyzer endpoint
    #[serde(default)]
    pub vision: VisionConfig,

    /// Pricing floor and commission inputs
    #[serde(default)]
    pub pricing: PricingConfig,

    /// Sales report time zone and cumulative start
    #[serde(default)]
    pub report: ReportConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `LISTING_INTAKE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// - `LISTING_INTAKE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `LISTING_INTAKE__SESSION__TIMEOUT_MINUTES=30` -> `session.timeout_minutes = 30`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("LISTING_INTAKE")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.session.validate()?;
        self.vision.validate(self.is_production())?;
        self.pricing.validate()?;
        self.report.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
