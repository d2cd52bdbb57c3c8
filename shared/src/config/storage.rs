//! Verification storage backend selection

use serde::{Deserialize, Serialize};

/// Where verification requests, issuance history and tokens live
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process memory; lost on restart
    #[default]
    Memory,
    /// MySQL tables
    Mysql,
    /// Redis keys with TTLs
    Redis,
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "in-memory" => Ok(StorageBackend::Memory),
            "mysql" | "database" => Ok(StorageBackend::Mysql),
            "redis" => Ok(StorageBackend::Redis),
            _ => Err(format!("Invalid storage backend: {}", s)),
        }
    }
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::Memory => write!(f, "memory"),
            StorageBackend::Mysql => write!(f, "mysql"),
            StorageBackend::Redis => write!(f, "redis"),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

impl StorageConfig {
    pub fn new(backend: StorageBackend) -> Self {
        Self { backend }
    }

    /// Create from the `STORAGE_BACKEND` environment variable
    pub fn from_env() -> Self {
        Self {
            backend: super::env_or("STORAGE_BACKEND", StorageBackend::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_backend_parsing() {
        assert_eq!("MySQL".parse::<StorageBackend>(), Ok(StorageBackend::Mysql));
        assert_eq!("in-memory".parse::<StorageBackend>(), Ok(StorageBackend::Memory));
        assert_eq!("redis".parse::<StorageBackend>(), Ok(StorageBackend::Redis));
        assert!("postgres".parse::<StorageBackend>().is_err());
    }
}
