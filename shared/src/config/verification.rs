//! Verification rules configuration
//!
//! Defaults mirror the product rules: a code lives for 3 minutes, allows 5
//! wrong guesses, a phone may receive 5 codes per rolling 24 hours, resends
//! for the same purpose are spaced 30 seconds apart, and a verified token is
//! good for 10 minutes.

use serde::{Deserialize, Serialize};

use super::env_or;

/// Verification code and token lifetimes and limits
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct VerificationConfig {
    /// Seconds before an issued code expires
    pub code_expiry_seconds: i64,

    /// Wrong submissions allowed per code
    pub max_attempts: i32,

    /// Codes a phone may receive within the daily window
    pub max_daily_sends: u32,

    /// Length of the rolling send window in seconds
    pub daily_window_seconds: i64,

    /// Minimum spacing between sends for the same phone and purpose
    pub cooldown_seconds: i64,

    /// Seconds a verified token remains redeemable
    pub token_expiry_seconds: i64,

    /// Origin appended to the SMS for the Web OTP API (`@origin #code`)
    pub web_otp_origin: Option<String>,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_expiry_seconds: 3 * 60,
            max_attempts: 5,
            max_daily_sends: 5,
            daily_window_seconds: 24 * 60 * 60,
            cooldown_seconds: 30,
            token_expiry_seconds: 10 * 60,
            web_otp_origin: None,
        }
    }
}

impl VerificationConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            code_expiry_seconds: env_or("VERIFICATION_CODE_EXPIRY_SECONDS", defaults.code_expiry_seconds),
            max_attempts: env_or("VERIFICATION_MAX_ATTEMPTS", defaults.max_attempts),
            max_daily_sends: env_or("VERIFICATION_MAX_DAILY_SENDS", defaults.max_daily_sends),
            daily_window_seconds: env_or("VERIFICATION_DAILY_WINDOW_SECONDS", defaults.daily_window_seconds),
            cooldown_seconds: env_or("VERIFICATION_COOLDOWN_SECONDS", defaults.cooldown_seconds),
            token_expiry_seconds: env_or("VERIFICATION_TOKEN_EXPIRY_SECONDS", defaults.token_expiry_seconds),
            web_otp_origin: std::env::var("WEB_OTP_ORIGIN").ok().filter(|o| !o.is_empty()),
        }
    }
}

/// Background sweeper configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReaperConfig {
    /// Whether the sweeper runs at all
    pub enabled: bool,

    /// Seconds between sweeps
    pub interval_seconds: u64,
}

impl Default for ReaperConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: 5 * 60,
        }
    }
}

impl ReaperConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: env_or("REAPER_ENABLED", defaults.enabled),
            interval_seconds: env_or("REAPER_INTERVAL_SECONDS", defaults.interval_seconds),
        }
    }
}
