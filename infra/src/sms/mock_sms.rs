//! Mock SMS Service Implementation
//!
//! Logs messages instead of sending them. Used in development and whenever
//! no gateway credentials are configured.

use async_trait::async_trait;
use ssum_shared::phone::{mask_phone_number, normalize_phone_number};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use super::sms_service::SmsService;
use crate::InfrastructureError;

/// Mock SMS service for development and testing
#[derive(Clone, Default)]
pub struct MockSmsService {
    /// Counter for tracking number of messages sent
    message_count: Arc<AtomicU64>,
    /// Whether to simulate failures (for testing)
    simulate_failure: bool,
    /// Origin for the Web OTP line
    web_otp_origin: Option<String>,
}

impl MockSmsService {
    /// Create a new mock SMS service
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock service that fails every send
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            ..Self::default()
        }
    }

    pub fn with_web_otp_origin(mut self, origin: Option<String>) -> Self {
        self.web_otp_origin = origin;
        self
    }

    /// Get the total number of messages sent
    pub fn get_message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SmsService for MockSmsService {
    async fn send_sms(&self, phone_number: &str, message: &str) -> Result<String, InfrastructureError> {
        let masked_phone = mask_phone_number(phone_number);

        if self.simulate_failure {
            warn!(phone = %masked_phone, "Mock SMS service simulating failure");
            return Err(InfrastructureError::Sms("Simulated SMS sending failure".to_string()));
        }

        let message_id = format!("mock_{}", Uuid::new_v4());
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;

        // Development only: the full text is logged so the code can be read
        info!(
            target: "sms_service",
            provider = "mock",
            phone = %masked_phone,
            to = %normalize_phone_number(phone_number),
            message_id = %message_id,
            count = count,
            content = %message,
            "SMS sent (mock)"
        );

        Ok(message_id)
    }

    fn web_otp_origin(&self) -> Option<&str> {
        self.web_otp_origin.as_deref()
    }

    fn provider_name(&self) -> &str {
        "Mock"
    }

    async fn is_available(&self) -> bool {
        !self.simulate_failure
    }
}
