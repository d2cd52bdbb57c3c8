//! Type definitions shared by the API and its clients
//!
//! - `language` - Response language negotiation
//! - `response` - API response wrappers

pub mod language;
pub mod response;

pub use language::Language;
pub use response::{ApiResponse, ErrorBody};
