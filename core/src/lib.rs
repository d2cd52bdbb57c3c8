//! # Ssum Core
//!
//! Core business logic and domain layer for the Ssum backend.
//! This crate contains the phone verification entities, the verification and
//! phone-auth services, storage and account ports with in-memory adapters,
//! and the error types the outer layers map to responses.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
