//! PostgreSQL settings, read only when `storage.backend = postgres`.
//!
//! Every open admission section pins one pooled connection until it commits
//! or rolls back, so `max_connections` also caps how many offerings can be
//! admitting at the same moment.

use serde::Deserialize;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

use super::error::ValidationError;

const MAX_POOL_SIZE: u32 = 100;

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `postgres://` or `postgresql://` connection string.
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Longest wait for a free pooled connection.
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,

    /// Apply `migrations/` at startup.
    #[serde(default)]
    pub run_migrations: bool,
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    /// Pool builder for the ledger, session store and user directory.
    pub fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::MissingRequired("DATABASE__URL"));
        }
        if !self.url.starts_with("postgres://") && !self.url.starts_with("postgresql://") {
            return Err(ValidationError::InvalidDatabaseUrl);
        }
        if !(1..=MAX_POOL_SIZE).contains(&self.max_connections) {
            return Err(ValidationError::InvalidPoolSize(self.max_connections));
        }
        Ok(())
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout(),
            run_migrations: false,
        }
    }
}

fn default_max_connections() -> u32 {
    20
}

fn default_acquire_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_url(url: &str) -> DatabaseConfig {
        DatabaseConfig {
            url: url.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_leave_migrations_off() {
        let config = DatabaseConfig::default();
        assert_eq!(config.max_connections, 20);
        assert_eq!(config.acquire_timeout(), Duration::from_secs(10));
        assert!(!config.run_migrations);
    }

    #[test]
    fn missing_url_names_the_variable() {
        assert_eq!(
            DatabaseConfig::default().validate(),
            Err(ValidationError::MissingRequired("DATABASE__URL"))
        );
    }

    #[test]
    fn accepts_both_postgres_schemes() {
        assert!(with_url("postgres://localhost/lectures").validate().is_ok());
        assert!(with_url("postgresql://app:pw@db:5432/lectures").validate().is_ok());
    }

    #[test]
    fn rejects_other_schemes() {
        assert_eq!(
            with_url("mysql://localhost/lectures").validate(),
            Err(ValidationError::InvalidDatabaseUrl)
        );
    }

    #[test]
    fn pool_size_must_be_within_bounds() {
        let empty = DatabaseConfig {
            max_connections: 0,
            ..with_url("postgres://localhost/lectures")
        };
        assert_eq!(empty.validate(), Err(ValidationError::InvalidPoolSize(0)));

        let huge = DatabaseConfig {
            max_connections: 150,
            ..with_url("postgres://localhost/lectures")
        };
        assert_eq!(huge.validate(), Err(ValidationError::InvalidPoolSize(150)));
    }
}
