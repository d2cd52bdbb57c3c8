//! Types for phone-auth workflow results

use chrono::{DateTime, Utc};

use crate::domain::entities::Purpose;

/// Result of sending a verification code
#[derive(Debug, Clone)]
pub struct SendCodeResult {
    /// Normalized phone number the code was sent to
    pub phone: String,
    /// Workflow the code was issued for
    pub purpose: Purpose,
    /// When the code stops being accepted
    pub expires_at: DateTime<Utc>,
    /// Seconds before another code may be requested for the same purpose
    pub resend_after_seconds: i64,
    /// The SMS message ID from the provider
    pub message_id: String,
}

/// Reachability of the services behind the phone-auth workflows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthReport {
    pub storage: bool,
    pub accounts: bool,
    pub sms: bool,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.storage && self.accounts && self.sms
    }
}
