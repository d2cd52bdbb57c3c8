//! Shared utilities and common types for the Ssum server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Phone number normalization and masking
//! - API response wrappers

pub mod config;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, CorsConfig, DatabaseConfig, Environment, ReaperConfig,
    ServerConfig, SmsConfig, StorageBackend, StorageConfig, VerificationConfig,
};
pub use types::{ApiResponse, ErrorBody, Language};
pub use utils::phone;
