//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `cache` - Redis connection configuration
//! - `database` - Database connection and pool configuration
//! - `environment` - Environment detection and logging configuration
//! - `server` - HTTP server and CORS configuration
//! - `sms` - SMS gateway selection and credentials
//! - `storage` - Which backend holds verification state
//! - `verification` - Code lifetimes, attempt caps and send limits

pub mod cache;
pub mod database;
pub mod environment;
pub mod server;
pub mod sms;
pub mod storage;
pub mod verification;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

// Re-export commonly used types
pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use server::{CorsConfig, ServerConfig};
pub use sms::{SmsConfig, SmsProvider};
pub use storage::{StorageBackend, StorageConfig};
pub use verification::{ReaperConfig, VerificationConfig};

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// CORS configuration
    pub cors: CorsConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Redis configuration
    pub cache: CacheConfig,

    /// Verification storage backend
    pub storage: StorageConfig,

    /// Verification rules
    pub verification: VerificationConfig,

    /// Expired-record sweeper
    pub reaper: ReaperConfig,

    /// SMS gateway configuration
    pub sms: SmsConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Create configuration for development environment
    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            cors: CorsConfig::development(),
            logging: LoggingConfig::for_environment(Environment::Development),
            ..Default::default()
        }
    }

    /// Create configuration for production environment
    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig::new("0.0.0.0", 8080),
            storage: StorageConfig::new(StorageBackend::Mysql),
            sms: SmsConfig {
                provider: SmsProvider::Solapi,
                ..Default::default()
            },
            logging: LoggingConfig::for_environment(Environment::Production),
            ..Default::default()
        }
    }

    /// Load configuration from environment
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        let logging = LoggingConfig::for_environment(environment);

        Self {
            environment,
            server: ServerConfig::from_env(),
            cors: if environment.is_development() {
                CorsConfig::development()
            } else {
                CorsConfig::default()
            },
            database: DatabaseConfig::from_env(),
            cache: CacheConfig::from_env(),
            storage: StorageConfig::from_env(),
            verification: VerificationConfig::from_env(),
            reaper: ReaperConfig::from_env(),
            sms: SmsConfig::from_env(),
            logging,
        }
    }
}

/// Read an environment variable and parse it, falling back to `default`
/// when it is missing or malformed.
pub(crate) fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_uses_memory_storage_and_mock_sms() {
        let config = AppConfig::default();
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.sms.provider, SmsProvider::Mock);
        assert_eq!(config.verification.max_attempts, 5);
        assert_eq!(config.verification.max_daily_sends, 5);
    }

    #[test]
    fn test_production_config_uses_durable_storage() {
        let config = AppConfig::production();
        assert!(config.environment.is_production());
        assert_eq!(config.storage.backend, StorageBackend::Mysql);
        assert_eq!(config.sms.provider, SmsProvider::Solapi);
    }

    #[test]
    fn test_env_or_falls_back_on_garbage() {
        std::env::set_var("SSUM_TEST_ENV_OR", "not-a-number");
        assert_eq!(env_or("SSUM_TEST_ENV_OR", 42u64), 42);
        std::env::set_var("SSUM_TEST_ENV_OR", " 7 ");
        assert_eq!(env_or("SSUM_TEST_ENV_OR", 42u64), 7);
        std::env::remove_var("SSUM_TEST_ENV_OR");
    }

    #[test]
    fn test_config_deserializes_from_partial_json() {
        let json = r#"{ "server": { "port": 9090 }, "verification": { "cooldown_seconds": 10 } }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.verification.cooldown_seconds, 10);
        assert_eq!(config.verification.code_expiry_seconds, 180);
    }
}
