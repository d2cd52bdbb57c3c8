//! Configuration for the verification service

use chrono::Duration;
use ssum_shared::VerificationConfig;

use crate::domain::entities::{DEFAULT_EXPIRATION_SECONDS, DEFAULT_TOKEN_EXPIRATION_SECONDS, MAX_ATTEMPTS};

/// Configuration for the verification service
#[derive(Debug, Clone)]
pub struct VerificationServiceConfig {
    /// How long an issued code stays valid
    pub code_ttl: Duration,
    /// Maximum number of wrong submissions per code
    pub max_attempts: i32,
    /// Codes a phone may receive within `daily_window`
    pub max_daily_sends: u32,
    /// Rolling window for the daily send limit
    pub daily_window: Duration,
    /// Minimum spacing between codes for the same phone and purpose
    pub resend_cooldown: Duration,
    /// How long a verified token stays redeemable
    pub token_ttl: Duration,
}

impl Default for VerificationServiceConfig {
    fn default() -> Self {
        Self {
            code_ttl: Duration::seconds(DEFAULT_EXPIRATION_SECONDS),
            max_attempts: MAX_ATTEMPTS,
            max_daily_sends: 5,
            daily_window: Duration::hours(24),
            resend_cooldown: Duration::seconds(30),
            token_ttl: Duration::seconds(DEFAULT_TOKEN_EXPIRATION_SECONDS),
        }
    }
}

impl From<&VerificationConfig> for VerificationServiceConfig {
    fn from(config: &VerificationConfig) -> Self {
        Self {
            code_ttl: Duration::seconds(config.code_expiry_seconds),
            max_attempts: config.max_attempts,
            max_daily_sends: config.max_daily_sends,
            daily_window: Duration::seconds(config.daily_window_seconds),
            resend_cooldown: Duration::seconds(config.cooldown_seconds),
            token_ttl: Duration::seconds(config.token_expiry_seconds),
        }
    }
}
