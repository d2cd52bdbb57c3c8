//! HTTP surface for phone verification
//!
//! Library exports for the binary and the integration tests.

pub mod app;
pub mod config;
pub mod dto;
pub mod handlers;
pub mod i18n;
pub mod middleware;
pub mod routes;

pub use app::create_app;
pub use routes::auth::AppState;
