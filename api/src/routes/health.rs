use actix_web::{web, HttpResponse};

use ssum_core::repositories::{AccountDirectory, VerificationStore};
use ssum_core::services::SmsSenderTrait;

use crate::routes::auth::AppState;

/// Health check endpoint handler
///
/// Answers 503 when storage, the account directory, or the SMS gateway is
/// unreachable.
pub async fn health_check<S, M, A>(state: web::Data<AppState<S, M, A>>) -> HttpResponse
where
    S: VerificationStore + 'static,
    M: SmsSenderTrait + 'static,
    A: AccountDirectory + 'static,
{
    let report = state.auth_service.health().await;
    let mut response = if report.is_healthy() {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };

    response.json(serde_json::json!({
        "status": if report.is_healthy() { "healthy" } else { "unhealthy" },
        "service": "ssum-api",
        "version": env!("CARGO_PKG_VERSION"),
        "storage": state.storage_backend.to_string(),
        "checks": {
            "storage": report.storage,
            "accounts": report.accounts,
            "sms": report.sms,
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
