use actix_web::{
    error::{InternalError, JsonPayloadError},
    http::StatusCode,
    HttpRequest, HttpResponse,
};
use ssum_core::errors::{AuthError, DomainError, RateLimitReason, VerificationError};
use ssum_shared::{ErrorBody, Language};
use validator::ValidationErrors;

use crate::i18n::{message, message_with, request_language};

/// Build an error response from a message catalog entry
///
/// Unknown keys fall back to the generic internal error.
pub fn error_response(
    code: &str,
    category: &str,
    key: &str,
    lang: Language,
    params: &[(&str, String)],
) -> (StatusCode, ErrorBody) {
    let (text, status) = message_with(category, key, lang, params)
        .or_else(|| message("general", "INTERNAL_ERROR", lang))
        .unwrap_or_else(|| ("Internal error".to_string(), 500));

    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, ErrorBody::new(code, text))
}

/// Handle domain errors with language support
pub fn domain_error_response(error: &DomainError, lang: Language) -> HttpResponse {
    match error {
        DomainError::Auth(auth_error) => auth_error_response(auth_error, lang),
        DomainError::Verification(verification_error) => verification_error_response(verification_error, lang),
        DomainError::Internal { message } => {
            tracing::error!(error = %message, event = "internal_error", "Request failed");
            let (_, body) = error_response("INTERNAL_ERROR", "general", "INTERNAL_ERROR", lang, &[]);
            HttpResponse::InternalServerError().json(body)
        }
    }
}

fn auth_error_response(error: &AuthError, lang: Language) -> HttpResponse {
    let (status, body) = error_response(error.code(), "auth", error.code(), lang, &[]);
    HttpResponse::build(status).json(body)
}

/// Map a verification outcome to its response
///
/// Rate limits are 429 with the retry hint in `details`; every other
/// verification failure is 400.
pub fn verification_error_response(error: &VerificationError, lang: Language) -> HttpResponse {
    let (status, body) = match error {
        VerificationError::RateLimited {
            reason,
            retry_after_seconds,
        } => {
            let (key, reason_code) = match reason {
                RateLimitReason::DailyLimit => ("DAILY_LIMIT", "daily_limit"),
                RateLimitReason::Cooldown => ("COOLDOWN", "cooldown"),
            };
            let seconds = retry_after_seconds.unwrap_or_default().to_string();
            let (status, body) =
                error_response(error.code(), "verification", key, lang, &[("seconds", seconds)]);
            let body = body.with_detail("reason", serde_json::json!(reason_code));
            let body = match retry_after_seconds {
                Some(seconds) => body.with_detail("retry_after_seconds", serde_json::json!(seconds)),
                None => body,
            };
            (status, body)
        }
        VerificationError::Mismatch { remaining_attempts } => {
            let (status, body) = error_response(
                error.code(),
                "verification",
                error.code(),
                lang,
                &[("remaining", remaining_attempts.to_string())],
            );
            (
                status,
                body.with_detail("remaining_attempts", serde_json::json!(remaining_attempts)),
            )
        }
        other => error_response(other.code(), "verification", other.code(), lang, &[]),
    };

    HttpResponse::build(status).json(body)
}

/// 400 response listing the fields that failed validation
pub fn validation_error_response(errors: &ValidationErrors, lang: Language) -> HttpResponse {
    let fields: serde_json::Map<String, serde_json::Value> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let codes: Vec<String> = errors.iter().map(|e| e.code.to_string()).collect();
            (field.to_string(), serde_json::json!(codes))
        })
        .collect();

    let (_, body) = error_response("VALIDATION_ERROR", "validation", "VALIDATION_ERROR", lang, &[]);
    HttpResponse::BadRequest().json(body.with_detail("fields", serde_json::Value::Object(fields)))
}

/// Error handler for malformed or incomplete JSON bodies
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    let lang = request_language(req);
    tracing::debug!(error = %err, path = %req.path(), "Rejected request body");

    let (_, body) = error_response("VALIDATION_ERROR", "validation", "VALIDATION_ERROR", lang, &[]);
    let response = HttpResponse::BadRequest().json(body);
    InternalError::from_response(err, response).into()
}
