//! SMS Service Trait Adapter
//!
//! Bridges any infrastructure [`SmsService`] to the core `SmsSenderTrait`.

use async_trait::async_trait;
use ssum_core::services::SmsSenderTrait;

use super::sms_service::SmsService;

/// Adapter that implements the core SmsSenderTrait over a boxed gateway
pub struct SmsServiceAdapter {
    inner: Box<dyn SmsService>,
}

impl SmsServiceAdapter {
    pub fn new(inner: Box<dyn SmsService>) -> Self {
        Self { inner }
    }

    pub fn provider_name(&self) -> &str {
        self.inner.provider_name()
    }
}

#[async_trait]
impl SmsSenderTrait for SmsServiceAdapter {
    async fn send_verification_code(&self, phone: &str, code: &str) -> Result<String, String> {
        self.inner
            .send_verification_code(phone, code)
            .await
            .map_err(|e| e.to_string())
    }

    async fn is_available(&self) -> bool {
        self.inner.is_available().await
    }
}
