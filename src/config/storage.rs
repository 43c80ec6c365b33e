//! Storage backend selection

use serde::Deserialize;

/// Which adapters back the storage ports
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local maps; state is lost on restart
    #[default]
    Memory,
    /// PostgreSQL via sqlx; requires the `database` section
    Postgres,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// JSON fixture preloaded into the memory backend
    pub seed_file: Option<String>,
}

impl StorageConfig {
    pub fn uses_postgres(&self) -> bool {
        self.backend == StorageBackend::Postgres
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_is_default() {
        let config = StorageConfig::default();
        assert_eq!(config.backend, StorageBackend::Memory);
        assert!(!config.uses_postgres());
        assert!(config.seed_file.is_none());
    }
}
