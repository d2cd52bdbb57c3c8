//! # Infrastructure Layer
//!
//! Concrete implementations of the core ports for the Ssum server.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Database**: MySQL verification store and account lookup using SQLx
//! - **Cache**: Redis verification store with native key expiry
//! - **SMS**: SMS gateway integrations (Solapi, mock)
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)
//! - `redis-cache`: Enable Redis support (default)

use ssum_core::errors::DomainError;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Cache module - Redis client and verification store
#[cfg(feature = "redis-cache")]
pub mod cache;

/// SMS service module - External SMS providers
pub mod sms;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Redis error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// SMS service error
    #[error("SMS service error: {0}")]
    Sms(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(error: InfrastructureError) -> Self {
        DomainError::internal(error)
    }
}
