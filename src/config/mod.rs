//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `LECTURE_REGISTRATION` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use lecture_registration::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {:?}", config.server.socket_addr());
//! ```

mod database;
mod error;
mod registration;
mod server;
mod storage;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use registration::RegistrationConfig;
pub use server::{Environment, ServerConfig};
pub use storage::{StorageBackend, StorageConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Storage backend selection
    #[serde(default)]
    pub storage: StorageConfig,

    /// Database configuration, required for the postgres backend
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Admission behavior
    #[serde(default)]
    pub registration: RegistrationConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `LECTURE_REGISTRATION` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `LECTURE_REGISTRATION__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `LECTURE_REGISTRATION__STORAGE__BACKEND=postgres` -> `storage.backend = postgres`
    /// - `LECTURE_REGISTRATION__DATABASE__URL=...` -> `database.url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("LECTURE_REGISTRATION")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// The database section is only checked when the postgres backend is
    /// selected.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.registration.validate()?;
        if self.storage.uses_postgres() {
            self.database_config()?.validate()?;
        }
        Ok(())
    }

    /// The database section, or an error naming the missing variable
    pub fn database_config(&self) -> Result<&DatabaseConfig, ValidationError> {
        self.database
            .as_ref()
            .ok_or(ValidationError::MissingRequired("DATABASE__URL"))
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
