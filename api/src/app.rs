//! Application factory
//!
//! Builds the Actix-web application around an already-wired [`AppState`].

use actix_web::body::MessageBody;
use actix_web::{web, App, HttpRequest, HttpResponse};
use tracing_actix_web::TracingLogger;

use ssum_core::repositories::{AccountDirectory, VerificationStore};
use ssum_core::services::SmsSenderTrait;
use ssum_shared::AppConfig;

use crate::handlers::{error_response, json_error_handler};
use crate::i18n::request_language;
use crate::middleware::create_cors;
use crate::routes::auth::{send_code::send_code, verify_code::verify_code, AppState};
use crate::routes::health::health_check;

/// Create and configure the application with all dependencies
pub fn create_app<S, M, A>(
    app_state: web::Data<AppState<S, M, A>>,
    config: &AppConfig,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    S: VerificationStore + 'static,
    M: SmsSenderTrait + 'static,
    A: AccountDirectory + 'static,
{
    App::new()
        .app_data(app_state)
        .app_data(
            web::JsonConfig::default()
                .limit(config.server.max_payload_size)
                .error_handler(json_error_handler),
        )
        // Order matters: CORS runs inside the request span
        .wrap(create_cors(&config.cors))
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health_check::<S, M, A>))
        .service(
            web::scope("/api/v1").service(
                web::scope("/auth")
                    .route("/send-code", web::post().to(send_code::<S, M, A>))
                    .route("/verify-code", web::post().to(verify_code::<S, M, A>)),
            ),
        )
        .default_service(web::route().to(not_found))
}

/// Default 404 handler
async fn not_found(req: HttpRequest) -> HttpResponse {
    let (status, body) = error_response("NOT_FOUND", "general", "NOT_FOUND", request_language(&req), &[]);
    HttpResponse::build(status).json(body)
}
