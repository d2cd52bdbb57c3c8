//! Integration tests for the signup and password reset flows

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use ssum_core::domain::entities::{AccountProvider, AccountSummary, Purpose};
    use ssum_core::errors::{DomainError, RateLimitReason, VerificationError};
    use ssum_core::repositories::{InMemoryAccountDirectory, InMemoryVerificationStore};
    use ssum_core::services::{
        PhoneAuthService, SmsSenderTrait, VerificationReaper, VerificationService,
        VerificationServiceConfig,
    };

    // Captures the last code sent to each phone
    #[derive(Default)]
    struct RecordingSms {
        inbox: Mutex<HashMap<String, String>>,
    }

    impl RecordingSms {
        fn last_code(&self, phone: &str) -> String {
            self.inbox.lock().unwrap().get(phone).cloned().unwrap()
        }
    }

    #[async_trait]
    impl SmsSenderTrait for RecordingSms {
        async fn send_verification_code(&self, phone: &str, code: &str) -> Result<String, String> {
            self.inbox
                .lock()
                .unwrap()
                .insert(phone.to_string(), code.to_string());
            Ok(format!("msg_{}", phone))
        }
    }

    fn build(
        config: VerificationServiceConfig,
    ) -> (
        PhoneAuthService<InMemoryVerificationStore, RecordingSms, InMemoryAccountDirectory>,
        Arc<VerificationService<InMemoryVerificationStore>>,
        Arc<RecordingSms>,
        Arc<InMemoryAccountDirectory>,
    ) {
        let store = Arc::new(InMemoryVerificationStore::new());
        let verification = Arc::new(VerificationService::new(store, config));
        let sms = Arc::new(RecordingSms::default());
        let accounts = Arc::new(InMemoryAccountDirectory::new());
        let service = PhoneAuthService::new(verification.clone(), sms.clone(), accounts.clone());
        (service, verification, sms, accounts)
    }

    #[tokio::test]
    async fn test_signup_flow() {
        let (service, _, sms, accounts) = build(VerificationServiceConfig::default());

        service.send_code("010-5555-1234", Purpose::Signup).await.unwrap();
        let code = sms.last_code("01055551234");

        let result = service
            .verify_code("01055551234", Purpose::Signup, &code)
            .await
            .unwrap();
        let token = result.verification_token.unwrap();

        let account = service
            .redeem_token(&token, "01055551234", Purpose::Signup, |phone| {
                let accounts = accounts.clone();
                async move {
                    let account = AccountSummary::new(phone, AccountProvider::Local);
                    accounts.insert(account.clone()).await;
                    Ok::<_, DomainError>(account)
                }
            })
            .await
            .unwrap();
        assert_eq!(account.phone, "01055551234");

        // The phone is now registered
        let again = service.send_code("01055551234", Purpose::Signup).await;
        assert!(again.is_err());

        // And a reset code can be requested instead
        service.send_code("01055551234", Purpose::Reset).await.unwrap();
    }

    #[tokio::test]
    async fn test_daily_limit_across_purposes() {
        let config = VerificationServiceConfig {
            resend_cooldown: chrono::Duration::zero(),
            ..Default::default()
        };
        let (service, _, _, accounts) = build(config);
        accounts
            .insert(AccountSummary::new("01055551234", AccountProvider::Local))
            .await;

        for _ in 0..5 {
            service.send_code("01055551234", Purpose::Reset).await.unwrap();
        }

        match service.send_code("01055551234", Purpose::Reset).await {
            Err(DomainError::Verification(VerificationError::RateLimited { reason, retry_after_seconds })) => {
                assert_eq!(reason, RateLimitReason::DailyLimit);
                assert!(retry_after_seconds.is_none());
            }
            other => panic!("Expected daily limit, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_expired_code_and_reaper() {
        let config = VerificationServiceConfig {
            code_ttl: chrono::Duration::milliseconds(50),
            ..Default::default()
        };
        let (service, verification, sms, _) = build(config);

        service.send_code("01055551234", Purpose::Signup).await.unwrap();
        let code = sms.last_code("01055551234");
        tokio::time::sleep(Duration::from_millis(100)).await;

        let reaper = Arc::new(VerificationReaper::new(verification, Duration::from_secs(3600)));
        let stats = reaper.run_once().await.unwrap();
        assert_eq!(stats.requests, 1);

        let result = service
            .verify_code("01055551234", Purpose::Signup, &code)
            .await
            .unwrap();
        assert_eq!(result.error, Some(VerificationError::NotFound));

        let handle = reaper.start();
        handle.stop().await;
    }
}
