//! Mapping from domain errors to HTTP responses

pub mod error;

pub use error::{
    domain_error_response, error_response, json_error_handler, validation_error_response,
    verification_error_response,
};
