//! Storage port for verification requests, the issuance log, and verified tokens.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::{Purpose, VerificationRequest, VerifiedToken};
use crate::errors::DomainError;

/// Row counts removed by one [`VerificationStore::purge_expired`] sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeStats {
    pub requests: u64,
    pub tokens: u64,
    pub issuances: u64,
}

impl PurgeStats {
    pub fn total(&self) -> u64 {
        self.requests + self.tokens + self.issuances
    }
}

/// Persistence for everything the verification service keeps between calls
///
/// Every method that reads then writes a single record must do so atomically
/// with respect to other callers of the same store. Requests are keyed by
/// `(phone, purpose)`; `request.id` distinguishes a request from the one that
/// superseded it.
#[async_trait]
pub trait VerificationStore: Send + Sync {
    /// Find the active request for a phone and purpose
    ///
    /// Returns the stored record even if it has expired; expiry is the
    /// caller's decision.
    async fn find_request(
        &self,
        phone: &str,
        purpose: Purpose,
    ) -> Result<Option<VerificationRequest>, DomainError>;

    /// Store `request` as the active request for its key and log the issuance
    ///
    /// Replaces any previous request for the same `(phone, purpose)`. The
    /// issuance is logged at `request.created_at`.
    async fn save_request(&self, request: &VerificationRequest) -> Result<(), DomainError>;

    /// Increment the attempt counter of the stored request
    ///
    /// # Returns
    /// * `Ok(Some(attempts))` - New attempt count
    /// * `Ok(None)` - The request is gone or was superseded
    async fn record_failed_attempt(
        &self,
        request: &VerificationRequest,
    ) -> Result<Option<i32>, DomainError>;

    /// Delete the stored request only if it is still `request`
    ///
    /// Returns `true` for exactly one caller when several race on the same
    /// request.
    async fn consume_request(&self, request: &VerificationRequest) -> Result<bool, DomainError>;

    /// Number of codes issued to `phone` (any purpose) at or after `since`
    async fn count_issued_since(
        &self,
        phone: &str,
        since: DateTime<Utc>,
    ) -> Result<u32, DomainError>;

    /// Time of the most recent issuance for a phone and purpose
    async fn last_issued_at(
        &self,
        phone: &str,
        purpose: Purpose,
    ) -> Result<Option<DateTime<Utc>>, DomainError>;

    /// Persist a freshly minted token
    async fn save_token(&self, token: &VerifiedToken) -> Result<(), DomainError>;

    /// Look up a token by value, expired or not
    async fn find_token(&self, token: &str) -> Result<Option<VerifiedToken>, DomainError>;

    /// Delete a token; returns whether it existed
    async fn delete_token(&self, token: &str) -> Result<bool, DomainError>;

    /// Delete requests and tokens expired before `now`, and issuance log
    /// entries older than `issuance_cutoff`
    async fn purge_expired(
        &self,
        now: DateTime<Utc>,
        issuance_cutoff: DateTime<Utc>,
    ) -> Result<PurgeStats, DomainError>;

    /// Check that the backend is reachable
    async fn health_check(&self) -> Result<(), DomainError> {
        Ok(())
    }
}
