//! Layered configuration loading
//!
//! Sources, lowest precedence first:
//! 1. Built-in defaults for the environment (`AppConfig::development()` or
//!    `AppConfig::production()`)
//! 2. `config/<environment>.{toml,yaml,json}` if present
//! 3. `SSUM__SECTION__KEY` environment variables
//! 4. The well-known variables listed in [`ENV_OVERRIDES`]

use std::str::FromStr;

use anyhow::{anyhow, Result};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File};
use ssum_shared::config::SmsProvider;
use ssum_shared::{AppConfig, Environment, StorageBackend};

/// Environment variables mapped onto configuration keys
pub const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("SERVER_HOST", "server.host"),
    ("SERVER_PORT", "server.port"),
    ("SERVER_WORKERS", "server.workers"),
    ("DATABASE_URL", "database.url"),
    ("DATABASE_MAX_CONNECTIONS", "database.max_connections"),
    ("DATABASE_CONNECT_TIMEOUT", "database.connect_timeout"),
    ("DATABASE_IDLE_TIMEOUT", "database.idle_timeout"),
    ("DATABASE_RUN_MIGRATIONS", "database.run_migrations"),
    ("REDIS_URL", "cache.url"),
    ("REDIS_KEY_PREFIX", "cache.key_prefix"),
    ("STORAGE_BACKEND", "storage.backend"),
    ("SMS_PROVIDER", "sms.provider"),
    ("SOLAPI_API_KEY", "sms.api_key"),
    ("SOLAPI_API_SECRET", "sms.api_secret"),
    ("SOLAPI_SENDER_PHONE", "sms.sender_phone"),
    ("SOLAPI_BASE_URL", "sms.api_base_url"),
    ("SMS_REQUEST_TIMEOUT_SECS", "sms.request_timeout_secs"),
    ("VERIFICATION_CODE_EXPIRY_SECONDS", "verification.code_expiry_seconds"),
    ("VERIFICATION_MAX_ATTEMPTS", "verification.max_attempts"),
    ("VERIFICATION_MAX_DAILY_SENDS", "verification.max_daily_sends"),
    ("VERIFICATION_DAILY_WINDOW_SECONDS", "verification.daily_window_seconds"),
    ("VERIFICATION_COOLDOWN_SECONDS", "verification.cooldown_seconds"),
    ("VERIFICATION_TOKEN_EXPIRY_SECONDS", "verification.token_expiry_seconds"),
    ("WEB_OTP_ORIGIN", "verification.web_otp_origin"),
    ("REAPER_ENABLED", "reaper.enabled"),
    ("REAPER_INTERVAL_SECONDS", "reaper.interval_seconds"),
    ("LOG_LEVEL", "logging.level"),
    ("LOG_FORMAT", "logging.format"),
];

/// Load configuration from files and the process environment
pub fn load_config() -> Result<AppConfig> {
    let builder = layered_builder(|key| std::env::var(key).ok())?.add_source(
        config::Environment::with_prefix("SSUM")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    );
    finish(builder)
}

/// Load configuration with a custom variable lookup
///
/// Skips the `SSUM__` prefixed source; used by tests.
pub fn load_config_with<F>(lookup: F) -> Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    finish(layered_builder(lookup)?)
}

fn layered_builder<F>(lookup: F) -> Result<ConfigBuilder<DefaultState>>
where
    F: Fn(&str) -> Option<String>,
{
    let environment = lookup("ENVIRONMENT")
        .or_else(|| lookup("ENV"))
        .and_then(|value| Environment::from_str(&value).ok())
        .unwrap_or_default();

    let mut base = if environment.is_development() {
        AppConfig::development()
    } else {
        AppConfig::production()
    };
    base.environment = environment;

    let mut builder = Config::builder()
        .add_source(Config::try_from(&base)?)
        .add_source(File::with_name(environment.config_file()).required(false));

    for (var, key) in ENV_OVERRIDES {
        let Some(value) = lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) else {
            continue;
        };
        let value = normalize(key, value)?;
        builder = builder.set_override(*key, value)?;
    }

    Ok(builder)
}

/// Map enum aliases onto their serialized names
fn normalize(key: &str, value: String) -> Result<String> {
    match key {
        "storage.backend" => StorageBackend::from_str(&value)
            .map(|backend| backend.to_string())
            .map_err(|e| anyhow!(e)),
        "sms.provider" => match SmsProvider::from_str(&value).map_err(|e| anyhow!(e))? {
            SmsProvider::Mock => Ok("mock".to_string()),
            SmsProvider::Solapi => Ok("solapi".to_string()),
        },
        "logging.format" => Ok(value.to_lowercase()),
        _ => Ok(value),
    }
}

fn finish(builder: ConfigBuilder<DefaultState>) -> Result<AppConfig> {
    let config: AppConfig = builder
        .build()
        .map_err(|e| anyhow!("Failed to build configuration: {}", e))?
        .try_deserialize()
        .map_err(|e| anyhow!("Invalid configuration: {}", e))?;

    validate(&config)?;
    Ok(config)
}

fn validate(config: &AppConfig) -> Result<()> {
    let verification = &config.verification;
    if verification.code_expiry_seconds <= 0 || verification.token_expiry_seconds <= 0 {
        return Err(anyhow!("Code and token lifetimes must be positive"));
    }
    if verification.max_attempts <= 0 {
        return Err(anyhow!("verification.max_attempts must be positive"));
    }
    if config.reaper.enabled && config.reaper.interval_seconds == 0 {
        return Err(anyhow!("reaper.interval_seconds must be positive"));
    }
    if matches!(config.storage.backend, StorageBackend::Mysql | StorageBackend::Redis)
        && config.database.url.is_empty()
    {
        return Err(anyhow!("DATABASE_URL is required for the {} backend", config.storage.backend));
    }
    Ok(())
}
