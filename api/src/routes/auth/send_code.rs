use actix_web::{web, HttpRequest, HttpResponse};
use ssum_shared::phone::mask_phone_number;
use ssum_shared::ApiResponse;
use validator::Validate;

use ssum_core::repositories::{AccountDirectory, VerificationStore};
use ssum_core::services::SmsSenderTrait;

use super::AppState;
use crate::dto::{SendCodeRequest, SendCodeResponse};
use crate::handlers::{domain_error_response, validation_error_response};
use crate::i18n::{message, request_language};

/// Handler for POST /api/v1/auth/send-code
///
/// # Request Body
///
/// ```json
/// { "phone": "010-1234-5678", "purpose": "signup" }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "success": true,
///     "expires_at": 1735689780000,
///     "resend_after": 30,
///     "message": "인증번호가 발송되었습니다. 3분 내에 입력해주세요."
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: malformed body or phone format
/// - 404 Not Found: resetting a phone with no account
/// - 409 Conflict: phone already registered, or a Kakao account
/// - 429 Too Many Requests: daily limit or cooldown, with `retry_after_seconds`
/// - 500 Internal Server Error: SMS delivery or storage failure
pub async fn send_code<S, M, A>(
    req: HttpRequest,
    state: web::Data<AppState<S, M, A>>,
    request: web::Json<SendCodeRequest>,
) -> HttpResponse
where
    S: VerificationStore + 'static,
    M: SmsSenderTrait + 'static,
    A: AccountDirectory + 'static,
{
    let lang = request_language(&req);

    if let Err(errors) = request.validate() {
        tracing::warn!(
            phone = %mask_phone_number(&request.phone),
            "Validation failed for send_code request"
        );
        return validation_error_response(&errors, lang);
    }

    match state.auth_service.send_code(&request.phone, request.purpose).await {
        Ok(result) => {
            let text = message("success", "CODE_SENT", lang)
                .map(|(text, _)| text)
                .unwrap_or_default();

            HttpResponse::Ok().json(
                ApiResponse::success(SendCodeResponse {
                    expires_at: result.expires_at.timestamp_millis(),
                    resend_after: result.resend_after_seconds,
                })
                .with_message(text),
            )
        }
        Err(error) => {
            tracing::info!(
                phone = %mask_phone_number(&request.phone),
                purpose = %request.purpose,
                error = %error,
                "send_code rejected"
            );
            domain_error_response(&error, lang)
        }
    }
}
