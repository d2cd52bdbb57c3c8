//! Traits for SMS delivery integration

use async_trait::async_trait;

/// Trait for SMS service integration
#[async_trait]
pub trait SmsSenderTrait: Send + Sync {
    /// Send a verification code via SMS, returning the provider's message id
    async fn send_verification_code(&self, phone: &str, code: &str) -> Result<String, String>;

    /// Whether the gateway can currently accept messages
    async fn is_available(&self) -> bool {
        true
    }
}
