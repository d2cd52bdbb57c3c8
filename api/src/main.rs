use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, HttpServer};
use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ssum_api::config::load_config;
use ssum_api::{create_app, AppState};
use ssum_core::repositories::{AccountDirectory, InMemoryAccountDirectory, InMemoryVerificationStore, VerificationStore};
use ssum_core::services::{PhoneAuthService, VerificationReaper, VerificationService, VerificationServiceConfig};
use ssum_infra::cache::{RedisClient, RedisVerificationStore};
use ssum_infra::database::{DatabasePool, MySqlAccountDirectory, MySqlVerificationStore};
use ssum_infra::sms::{create_sms_service, SmsServiceAdapter};
use ssum_shared::config::{LogFormat, LoggingConfig};
use ssum_shared::{AppConfig, StorageBackend};

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = load_config()?;
    init_tracing(&config.logging);

    tracing::info!(
        environment = %config.environment,
        storage = %config.storage.backend,
        "Starting Ssum API server"
    );

    let sms = Arc::new(SmsServiceAdapter::new(create_sms_service(
        &config.sms,
        config.verification.web_otp_origin.clone(),
    )));
    tracing::info!(provider = sms.provider_name(), "SMS service ready");

    match config.storage.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory verification storage; state is lost on restart");
            serve(
                &config,
                Arc::new(InMemoryVerificationStore::new()),
                Arc::new(InMemoryAccountDirectory::new()),
                sms,
            )
            .await
        }
        StorageBackend::Mysql => {
            let db = DatabasePool::new(config.database.clone())
                .await
                .context("Failed to connect to MySQL")?;
            let pool = db.get_pool().clone();
            let result = serve(
                &config,
                Arc::new(MySqlVerificationStore::new(pool.clone())),
                Arc::new(MySqlAccountDirectory::new(pool)),
                sms,
            )
            .await;
            db.close().await;
            result
        }
        StorageBackend::Redis => {
            let redis = RedisClient::new(&config.cache)
                .await
                .context("Failed to connect to Redis")?;
            // Accounts always live in MySQL
            let db = DatabasePool::new(config.database.clone())
                .await
                .context("Failed to connect to MySQL")?;
            let issuance_ttl = config.verification.daily_window_seconds.max(1) as u64;
            let result = serve(
                &config,
                Arc::new(RedisVerificationStore::new(redis, issuance_ttl)),
                Arc::new(MySqlAccountDirectory::new(db.get_pool().clone())),
                sms,
            )
            .await;
            db.close().await;
            result
        }
    }
}

/// Wire the services for one storage backend and run the HTTP server
///
/// The reaper is stopped after the server has shut down.
async fn serve<S, A>(
    config: &AppConfig,
    store: Arc<S>,
    accounts: Arc<A>,
    sms: Arc<SmsServiceAdapter>,
) -> Result<()>
where
    S: VerificationStore + 'static,
    A: AccountDirectory + 'static,
{
    let verification = Arc::new(VerificationService::new(
        store,
        VerificationServiceConfig::from(&config.verification),
    ));
    let auth_service = Arc::new(PhoneAuthService::new(verification.clone(), sms, accounts));

    let reaper = if config.reaper.enabled {
        let reaper = Arc::new(VerificationReaper::new(
            verification,
            Duration::from_secs(config.reaper.interval_seconds),
        ));
        Some(reaper.start())
    } else {
        tracing::info!("Verification reaper disabled");
        None
    };

    let state = web::Data::new(AppState::new(auth_service, config.storage.backend));
    let app_config = config.clone();
    let bind_address = config.server.bind_address();

    tracing::info!(address = %bind_address, "Binding HTTP server");

    let mut server = HttpServer::new(move || create_app(state.clone(), &app_config))
        .keep_alive(Duration::from_secs(config.server.keep_alive))
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    let result = server.run().await;

    if let Some(handle) = reaper {
        handle.stop().await;
    }

    tracing::info!("Server stopped");
    result.context("HTTP server error")
}

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let registry = tracing_subscriber::registry().with(filter);

    match logging.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().pretty().with_line_number(true))
            .init(),
        LogFormat::Compact => registry
            .with(tracing_subscriber::fmt::layer().compact().with_target(true))
            .init(),
    }
}
