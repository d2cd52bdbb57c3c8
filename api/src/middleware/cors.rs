//! CORS middleware configuration for cross-origin requests.
//!
//! The web client calls the verification endpoints from the browser, so the
//! allowed origins come from configuration. Development allows any origin.

use actix_cors::Cors;
use actix_web::http::header;
use ssum_shared::CorsConfig;

/// Creates a CORS middleware instance from configuration.
///
/// An `*` entry in `allowed_origins` allows any origin; otherwise only the
/// listed origins are accepted.
pub fn create_cors(config: &CorsConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(config.allowed_methods.iter().map(String::as_str))
        .allowed_headers(vec![
            header::ACCEPT,
            header::ACCEPT_LANGUAGE,
            header::CONTENT_TYPE,
            header::ORIGIN,
            header::HeaderName::from_static("x-requested-with"),
        ])
        .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
        .max_age(config.max_age);

    if config.allows_any_origin() {
        tracing::info!("Configuring CORS to allow any origin");
        cors = cors.allow_any_origin();
    } else {
        for origin in config.allowed_origins.iter().map(|s| s.trim()) {
            if !origin.is_empty() {
                tracing::info!(origin = %origin, "Adding allowed origin");
                cors = cors.allowed_origin(origin);
            }
        }
    }

    if config.allow_credentials {
        cors = cors.supports_credentials();
    }

    cors
}
