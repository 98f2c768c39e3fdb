//! Application configuration schemas.
//!
//! Configuration is read from an optional TOML file via the `config`
//! crate and overlaid with `DROPZONE_`-prefixed environment variables.
//! Every section has defaults, so an empty configuration is valid.

pub mod backend;
pub mod browser;
pub mod logging;
pub mod upload;

use serde::{Deserialize, Serialize};

pub use self::backend::BackendConfig;
pub use self::browser::BrowserConfig;
pub use self::logging::LoggingConfig;
pub use self::upload::UploadConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Record-store project identifiers.
    #[serde(default)]
    pub backend: BackendConfig,
    /// Simulated upload timing.
    #[serde(default)]
    pub upload: UploadConfig,
    /// Browser session defaults.
    #[serde(default)]
    pub browser: BrowserConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file and the environment.
    ///
    /// The file is optional. Environment variables prefixed with
    /// `DROPZONE_` override it, with `__` separating section and key
    /// (e.g. `DROPZONE_BACKEND__PROJECT_ID`).
    pub fn load(path: &str) -> Result<Self, AppError> {
        let config: Self = Self::builder(path)
            .add_source(
                config::Environment::with_prefix("DROPZONE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file only, ignoring the environment.
    pub fn load_file(path: &str) -> Result<Self, AppError> {
        let config: Self = Self::builder(path)
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints the schema cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        self.upload.validate()
    }

    fn builder(path: &str) -> config::ConfigBuilder<config::builder::DefaultState> {
        config::Config::builder().add_source(config::File::with_name(path).required(false))
    }
}
