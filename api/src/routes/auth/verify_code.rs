use actix_web::{web, HttpRequest, HttpResponse};
use ssum_shared::phone::mask_phone_number;
use ssum_shared::ApiResponse;
use validator::Validate;

use ssum_core::repositories::{AccountDirectory, VerificationStore};
use ssum_core::services::SmsSenderTrait;

use super::AppState;
use crate::dto::{VerifyCodeRequest, VerifyCodeResponse};
use crate::handlers::{domain_error_response, error_response, validation_error_response, verification_error_response};
use crate::i18n::{message, request_language};

/// Handler for POST /api/v1/auth/verify-code
///
/// On success returns the single-use `verification_token` that the signup or
/// password reset request must carry.
///
/// ## Errors
/// - 400 Bad Request: malformed input, or any failed verification
///   (`NOT_FOUND`, `EXPIRED`, `ATTEMPTS_EXHAUSTED`, `MISMATCH` with
///   `details.remaining_attempts`)
/// - 500 Internal Server Error: storage failure
pub async fn verify_code<S, M, A>(
    req: HttpRequest,
    state: web::Data<AppState<S, M, A>>,
    request: web::Json<VerifyCodeRequest>,
) -> HttpResponse
where
    S: VerificationStore + 'static,
    M: SmsSenderTrait + 'static,
    A: AccountDirectory + 'static,
{
    let lang = request_language(&req);

    if let Err(errors) = request.validate() {
        if errors.field_errors().contains_key("code") {
            let (status, body) = error_response("VALIDATION_ERROR", "validation", "MISSING_CODE", lang, &[]);
            return HttpResponse::build(status).json(body);
        }
        return validation_error_response(&errors, lang);
    }

    let result = match state
        .auth_service
        .verify_code(&request.phone, request.purpose, &request.code)
        .await
    {
        Ok(result) => result,
        Err(error) => return domain_error_response(&error, lang),
    };

    match (result.verification_token, result.error) {
        (Some(token), _) if result.success => {
            let text = message("success", "CODE_VERIFIED", lang)
                .map(|(text, _)| text)
                .unwrap_or_default();

            HttpResponse::Ok().json(
                ApiResponse::success(VerifyCodeResponse {
                    verification_token: token,
                })
                .with_message(text),
            )
        }
        (_, Some(error)) => {
            tracing::info!(
                phone = %mask_phone_number(&request.phone),
                purpose = %request.purpose,
                error = error.code(),
                "verify_code failed"
            );
            verification_error_response(&error, lang)
        }
        _ => {
            tracing::error!("Verification result carried neither a token nor an error");
            let (status, body) = error_response("INTERNAL_ERROR", "general", "INTERNAL_ERROR", lang, &[]);
            HttpResponse::build(status).json(body)
        }
    }
}
