//! Main verification service implementation

use chrono::{DateTime, Duration, Utc};
use ssum_shared::phone::mask_phone_number;
use std::sync::Arc;

use crate::domain::entities::{Purpose, VerificationRequest, VerifiedToken};
use crate::errors::{DomainResult, RateLimitReason, VerificationError};
use crate::repositories::{PurgeStats, VerificationStore};

use super::config::VerificationServiceConfig;
use super::types::{IssueCheck, IssuedCode, VerifyCodeResult};

/// Verification service for the code and token lifecycle
///
/// Expects phone numbers already normalized to `010XXXXXXXX`; input parsing
/// belongs to the caller.
pub struct VerificationService<S: VerificationStore> {
    /// Backing store for requests, issuances, and tokens
    store: Arc<S>,
    /// Service configuration
    config: VerificationServiceConfig,
}

impl<S: VerificationStore> VerificationService<S> {
    /// Create a new verification service
    ///
    /// # Arguments
    ///
    /// * `store` - Store implementation
    /// * `config` - Service configuration
    pub fn new(store: Arc<S>, config: VerificationServiceConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &VerificationServiceConfig {
        &self.config
    }

    /// Check whether a new code may be issued for a phone and purpose
    ///
    /// The daily limit counts codes sent to the phone for any purpose within
    /// the rolling window and is checked first. The cooldown only looks at the
    /// same purpose. This method has no side effects.
    pub async fn can_issue(&self, phone: &str, purpose: Purpose) -> DomainResult<IssueCheck> {
        let now = Utc::now();

        let issued = self
            .store
            .count_issued_since(phone, now - self.config.daily_window)
            .await?;
        if issued >= self.config.max_daily_sends {
            tracing::warn!(
                phone = %mask_phone_number(phone),
                purpose = %purpose,
                issued = issued,
                event = "daily_limit_exceeded",
                "Daily verification code limit reached"
            );
            return Ok(IssueCheck::denied(RateLimitReason::DailyLimit, None));
        }

        if let Some(last) = self.store.last_issued_at(phone, purpose).await? {
            if let Some(retry_after) = self.cooldown_remaining(now, last) {
                tracing::warn!(
                    phone = %mask_phone_number(phone),
                    purpose = %purpose,
                    retry_after_seconds = retry_after,
                    event = "cooldown_active",
                    "Verification code requested during cooldown"
                );
                return Ok(IssueCheck::denied(RateLimitReason::Cooldown, Some(retry_after)));
            }
        }

        Ok(IssueCheck::allowed())
    }

    /// Whole seconds left in the cooldown, rounded up, or `None` once it lapsed
    fn cooldown_remaining(&self, now: DateTime<Utc>, last: DateTime<Utc>) -> Option<i64> {
        let elapsed = (now - last).max(Duration::zero());
        if elapsed >= self.config.resend_cooldown {
            return None;
        }
        let remaining_ms = (self.config.resend_cooldown - elapsed).num_milliseconds();
        Some((remaining_ms + 999) / 1000)
    }

    /// Issue a new code, replacing any active request for the same key
    ///
    /// Does not check rate limits and does not send anything; callers run
    /// [`can_issue`](Self::can_issue) first and deliver the code themselves.
    pub async fn issue(&self, phone: &str, purpose: Purpose) -> DomainResult<IssuedCode> {
        let request = VerificationRequest::new(phone.to_string(), purpose, self.config.code_ttl);
        self.store.save_request(&request).await?;

        tracing::info!(
            phone = %mask_phone_number(phone),
            purpose = %purpose,
            request_id = %request.id,
            event = "otp_generated",
            "Issued new verification code"
        );

        Ok(IssuedCode {
            code: request.code,
            expires_at: request.expires_at,
        })
    }

    /// Verify a submitted code
    ///
    /// Checks run in order: no active request, expiry, exhausted attempts,
    /// mismatch, match. Expired and exhausted requests are removed. A match
    /// consumes the request and mints a single-use token; if another caller
    /// consumed it first, this one sees `NotFound`.
    pub async fn verify(
        &self,
        phone: &str,
        purpose: Purpose,
        submitted: &str,
    ) -> DomainResult<VerifyCodeResult> {
        let masked = mask_phone_number(phone);

        let Some(request) = self.store.find_request(phone, purpose).await? else {
            tracing::info!(phone = %masked, purpose = %purpose, event = "otp_not_found", "No active verification request");
            return Ok(VerifyCodeResult::failed(VerificationError::NotFound));
        };

        if request.is_expired_at(Utc::now()) {
            self.store.consume_request(&request).await?;
            tracing::info!(phone = %masked, purpose = %purpose, event = "otp_expired", "Verification code expired");
            return Ok(VerifyCodeResult::failed(VerificationError::Expired));
        }

        if request.is_exhausted(self.config.max_attempts) {
            self.store.consume_request(&request).await?;
            tracing::warn!(
                phone = %masked,
                purpose = %purpose,
                event = "otp_attempts_exhausted",
                "Verification attempts exhausted"
            );
            return Ok(VerifyCodeResult::failed(VerificationError::AttemptsExhausted));
        }

        if !request.matches(submitted) {
            let attempts = self
                .store
                .record_failed_attempt(&request)
                .await?
                .unwrap_or(request.attempts + 1);
            let remaining_attempts = (self.config.max_attempts - attempts).max(0);
            tracing::warn!(
                phone = %masked,
                purpose = %purpose,
                attempts = attempts,
                remaining_attempts = remaining_attempts,
                event = "otp_mismatch",
                "Verification code mismatch"
            );
            return Ok(VerifyCodeResult::failed(VerificationError::Mismatch {
                remaining_attempts,
            }));
        }

        if !self.store.consume_request(&request).await? {
            tracing::info!(
                phone = %masked,
                purpose = %purpose,
                event = "otp_already_consumed",
                "Verification request consumed concurrently"
            );
            return Ok(VerifyCodeResult::failed(VerificationError::NotFound));
        }

        let token = VerifiedToken::new(phone.to_string(), purpose, self.config.token_ttl);
        self.store.save_token(&token).await?;

        tracing::info!(
            phone = %masked,
            purpose = %purpose,
            event = "otp_verified",
            "Phone number verified"
        );

        Ok(VerifyCodeResult::verified(token.token))
    }

    /// Check that a token exists, is unexpired, and is bound to this phone and purpose
    ///
    /// Does not consume the token. An expired token is deleted when found.
    pub async fn is_token_valid(
        &self,
        token: &str,
        phone: &str,
        purpose: Purpose,
    ) -> DomainResult<bool> {
        let Some(stored) = self.store.find_token(token).await? else {
            return Ok(false);
        };

        if stored.is_expired_at(Utc::now()) {
            self.store.delete_token(token).await?;
            tracing::debug!(event = "token_expired", "Purged expired verification token");
            return Ok(false);
        }

        Ok(stored.is_bound_to(phone, purpose))
    }

    /// Delete a token; unknown tokens are ignored
    pub async fn consume_token(&self, token: &str) -> DomainResult<()> {
        if self.store.delete_token(token).await? {
            tracing::info!(event = "token_consumed", "Verification token consumed");
        }
        Ok(())
    }

    /// Seconds until the active code expires, `None` when there is none
    pub async fn remaining_seconds(&self, phone: &str, purpose: Purpose) -> DomainResult<Option<i64>> {
        let now = Utc::now();
        Ok(self
            .store
            .find_request(phone, purpose)
            .await?
            .filter(|request| !request.is_expired_at(now))
            .map(|request| request.time_until_expiration(now).num_seconds()))
    }

    /// Remove everything expired as of `now`
    ///
    /// Issuance log entries are kept for one daily window so the send limit
    /// still sees them.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> DomainResult<PurgeStats> {
        self.store
            .purge_expired(now, now - self.config.daily_window)
            .await
    }

    /// Check that the backing store is reachable
    pub async fn health_check(&self) -> DomainResult<()> {
        self.store.health_check().await
    }
}
