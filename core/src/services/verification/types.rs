//! Types for verification service results

use chrono::{DateTime, Utc};

use crate::errors::{RateLimitReason, VerificationError};

/// Outcome of the rate-limit check that precedes issuing a code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueCheck {
    /// Whether a new code may be issued now
    pub allowed: bool,
    /// Seconds until the cooldown lapses; absent for the daily limit
    pub retry_after_seconds: Option<i64>,
    /// Why issuing was refused
    pub reason: Option<RateLimitReason>,
}

impl IssueCheck {
    pub fn allowed() -> Self {
        Self {
            allowed: true,
            retry_after_seconds: None,
            reason: None,
        }
    }

    pub fn denied(reason: RateLimitReason, retry_after_seconds: Option<i64>) -> Self {
        Self {
            allowed: false,
            retry_after_seconds,
            reason: Some(reason),
        }
    }

    /// The rate-limit error for a denied check
    pub fn into_error(self) -> Option<VerificationError> {
        match self.reason {
            Some(reason) if !self.allowed => Some(VerificationError::RateLimited {
                reason,
                retry_after_seconds: self.retry_after_seconds,
            }),
            _ => None,
        }
    }
}

/// A freshly issued code, ready to be sent
#[derive(Debug, Clone)]
pub struct IssuedCode {
    /// The 6-digit code
    pub code: String,
    /// When the code stops being accepted
    pub expires_at: DateTime<Utc>,
}

/// Result of verifying a code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyCodeResult {
    /// Whether the verification was successful
    pub success: bool,
    /// Token proving phone ownership (on success)
    pub verification_token: Option<String>,
    /// Why verification failed
    pub error: Option<VerificationError>,
}

impl VerifyCodeResult {
    pub fn verified(token: String) -> Self {
        Self {
            success: true,
            verification_token: Some(token),
            error: None,
        }
    }

    pub fn failed(error: VerificationError) -> Self {
        Self {
            success: false,
            verification_token: None,
            error: Some(error),
        }
    }
}
