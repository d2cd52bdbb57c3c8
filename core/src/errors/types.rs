//! Error types for phone verification and the account workflows built on it
//!
//! Error messages shown to users are configured in the presentation layer;
//! the `Display` strings here are for logs.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Input and account-state errors raised by the phone-auth workflow
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid phone format: {phone}")]
    InvalidPhoneFormat { phone: String },

    #[error("Invalid verification code format")]
    InvalidCodeFormat,

    #[error("Phone number already registered")]
    PhoneAlreadyRegistered,

    #[error("Phone number not registered")]
    PhoneNotRegistered,

    #[error("Account is linked to Kakao login")]
    KakaoAccount,

    #[error("SMS service failure")]
    SmsServiceFailure,
}

impl AuthError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidPhoneFormat { .. } => "INVALID_PHONE_FORMAT",
            AuthError::InvalidCodeFormat => "INVALID_CODE_FORMAT",
            AuthError::PhoneAlreadyRegistered => "PHONE_ALREADY_REGISTERED",
            AuthError::PhoneNotRegistered => "PHONE_NOT_REGISTERED",
            AuthError::KakaoAccount => "KAKAO_ACCOUNT",
            AuthError::SmsServiceFailure => "SMS_SERVICE_FAILURE",
        }
    }
}

/// Why issuing a new code was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateLimitReason {
    /// Too many codes sent to this phone in the trailing 24 hours
    DailyLimit,
    /// Last code for this phone and purpose was sent too recently
    Cooldown,
}

/// Recoverable verification outcomes
///
/// These travel as values inside results; callers branch on them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("Rate limited ({reason:?})")]
    RateLimited {
        reason: RateLimitReason,
        retry_after_seconds: Option<i64>,
    },

    #[error("No active verification request")]
    NotFound,

    #[error("Verification code expired")]
    Expired,

    #[error("Maximum attempts exceeded")]
    AttemptsExhausted,

    #[error("Verification code mismatch ({remaining_attempts} attempts left)")]
    Mismatch { remaining_attempts: i32 },

    #[error("Invalid or expired verification token")]
    InvalidToken,
}

impl VerificationError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            VerificationError::RateLimited { .. } => "RATE_LIMITED",
            VerificationError::NotFound => "NOT_FOUND",
            VerificationError::Expired => "EXPIRED",
            VerificationError::AttemptsExhausted => "ATTEMPTS_EXHAUSTED",
            VerificationError::Mismatch { .. } => "MISMATCH",
            VerificationError::InvalidToken => "INVALID_TOKEN",
        }
    }
}
