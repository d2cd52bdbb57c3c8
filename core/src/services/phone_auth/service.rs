//! Phone-auth workflow implementation

use ssum_shared::phone::{is_valid_verification_code, mask_phone_number, parse_mobile};
use std::future::Future;
use std::sync::Arc;

use crate::domain::entities::Purpose;
use crate::errors::{AuthError, DomainError, DomainResult, VerificationError};
use crate::repositories::{AccountDirectory, VerificationStore};
use crate::services::verification::{VerificationService, VerifyCodeResult};

use super::traits::SmsSenderTrait;
use super::types::{HealthReport, SendCodeResult};

/// Send-code, verify-code, and token redemption for signup and password reset
pub struct PhoneAuthService<S, M, A>
where
    S: VerificationStore,
    M: SmsSenderTrait,
    A: AccountDirectory,
{
    /// Verification service for the code and token lifecycle
    verification_service: Arc<VerificationService<S>>,
    /// SMS service for delivering codes
    sms_service: Arc<M>,
    /// Account lookup for registration state
    accounts: Arc<A>,
}

impl<S, M, A> PhoneAuthService<S, M, A>
where
    S: VerificationStore,
    M: SmsSenderTrait,
    A: AccountDirectory,
{
    pub fn new(
        verification_service: Arc<VerificationService<S>>,
        sms_service: Arc<M>,
        accounts: Arc<A>,
    ) -> Self {
        Self {
            verification_service,
            sms_service,
            accounts,
        }
    }

    pub fn verification_service(&self) -> &Arc<VerificationService<S>> {
        &self.verification_service
    }

    /// Send a verification code to a phone number
    ///
    /// This method:
    /// 1. Normalizes the phone number and validates its format
    /// 2. Checks the account state required by the purpose
    /// 3. Checks the daily limit and resend cooldown
    /// 4. Issues a code and sends it via SMS
    ///
    /// If the SMS fails the issued request is left to expire; it still counts
    /// toward the daily limit.
    pub async fn send_code(&self, raw_phone: &str, purpose: Purpose) -> DomainResult<SendCodeResult> {
        let phone = Self::normalize(raw_phone)?;
        let masked = mask_phone_number(&phone);

        self.check_account(&phone, purpose).await?;

        let check = self.verification_service.can_issue(&phone, purpose).await?;
        if let Some(error) = check.into_error() {
            return Err(error.into());
        }

        let issued = self.verification_service.issue(&phone, purpose).await?;

        let message_id = self
            .sms_service
            .send_verification_code(&phone, &issued.code)
            .await
            .map_err(|e| {
                tracing::error!(
                    phone = %masked,
                    purpose = %purpose,
                    error = %e,
                    event = "sms_send_failed",
                    "Failed to send verification SMS"
                );
                AuthError::SmsServiceFailure
            })?;

        tracing::info!(
            phone = %masked,
            purpose = %purpose,
            message_id = %message_id,
            event = "otp_sent",
            "Verification code sent"
        );

        Ok(SendCodeResult {
            phone,
            purpose,
            expires_at: issued.expires_at,
            resend_after_seconds: self.verification_service.config().resend_cooldown.num_seconds(),
            message_id,
        })
    }

    /// Verify a code submitted for a phone number
    ///
    /// Input format errors are returned as `Err`; verification outcomes are
    /// reported in the result.
    pub async fn verify_code(
        &self,
        raw_phone: &str,
        purpose: Purpose,
        code: &str,
    ) -> DomainResult<VerifyCodeResult> {
        let phone = Self::normalize(raw_phone)?;
        let code = code.trim();
        if !is_valid_verification_code(code) {
            return Err(AuthError::InvalidCodeFormat.into());
        }

        self.verification_service.verify(&phone, purpose, code).await
    }

    /// Redeem a verified token by running an account mutation
    ///
    /// The token must be valid for the phone and purpose. `mutation` receives
    /// the normalized phone number. The token is consumed only after the
    /// mutation succeeds, so a failed signup or password change can be retried
    /// with the same token.
    pub async fn redeem_token<T, F, Fut>(
        &self,
        token: &str,
        raw_phone: &str,
        purpose: Purpose,
        mutation: F,
    ) -> DomainResult<T>
    where
        F: FnOnce(String) -> Fut + Send,
        Fut: Future<Output = DomainResult<T>> + Send,
        T: Send,
    {
        let phone = Self::normalize(raw_phone)?;

        if !self
            .verification_service
            .is_token_valid(token, &phone, purpose)
            .await?
        {
            tracing::warn!(
                phone = %mask_phone_number(&phone),
                purpose = %purpose,
                event = "token_rejected",
                "Verification token rejected"
            );
            return Err(VerificationError::InvalidToken.into());
        }

        let value = mutation(phone).await?;
        self.verification_service.consume_token(token).await?;
        Ok(value)
    }

    /// Seconds until the active code for a phone expires
    pub async fn remaining_seconds(&self, raw_phone: &str, purpose: Purpose) -> DomainResult<Option<i64>> {
        let phone = Self::normalize(raw_phone)?;
        self.verification_service.remaining_seconds(&phone, purpose).await
    }

    /// Check every dependency the workflows need
    pub async fn health(&self) -> HealthReport {
        let (storage, accounts, sms) = tokio::join!(
            self.verification_service.health_check(),
            self.accounts.health_check(),
            self.sms_service.is_available(),
        );

        if let Err(e) = &storage {
            tracing::warn!(error = %e, component = "storage", "Health check failed");
        }
        if let Err(e) = &accounts {
            tracing::warn!(error = %e, component = "accounts", "Health check failed");
        }
        if !sms {
            tracing::warn!(component = "sms", "SMS gateway unavailable");
        }

        HealthReport {
            storage: storage.is_ok(),
            accounts: accounts.is_ok(),
            sms,
        }
    }

    fn normalize(raw_phone: &str) -> DomainResult<String> {
        parse_mobile(raw_phone).ok_or_else(|| {
            DomainError::from(AuthError::InvalidPhoneFormat {
                phone: mask_phone_number(raw_phone),
            })
        })
    }

    /// Signup needs an unregistered phone; reset needs a local account
    async fn check_account(&self, phone: &str, purpose: Purpose) -> DomainResult<()> {
        let account = self.accounts.find_by_phone(phone).await?;

        match (purpose, account) {
            (Purpose::Signup, None) => Ok(()),
            (Purpose::Signup, Some(account)) if account.is_kakao() => Err(AuthError::KakaoAccount.into()),
            (Purpose::Signup, Some(_)) => Err(AuthError::PhoneAlreadyRegistered.into()),
            (Purpose::Reset, None) => Err(AuthError::PhoneNotRegistered.into()),
            (Purpose::Reset, Some(account)) if account.is_kakao() => Err(AuthError::KakaoAccount.into()),
            (Purpose::Reset, Some(_)) => Ok(()),
        }
    }
}
