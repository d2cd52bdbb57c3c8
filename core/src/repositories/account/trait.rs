//! Read-only lookup of registered accounts by phone number.

use async_trait::async_trait;

use crate::domain::entities::AccountSummary;
use crate::errors::DomainError;

/// Account lookup used to gate code issuance
///
/// Verification never mutates accounts; signup and password changes happen in
/// the caller's mutation passed to `PhoneAuthService::redeem_token`.
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// Find the account registered to a normalized phone number
    async fn find_by_phone(&self, phone: &str) -> Result<Option<AccountSummary>, DomainError>;

    /// Check that the backing directory is reachable
    async fn health_check(&self) -> Result<(), DomainError> {
        Ok(())
    }
}
