//! SMS Service Interface
//!
//! Defines the trait for SMS gateways that deliver verification codes.

use async_trait::async_trait;

use crate::InfrastructureError;

/// Product name shown at the start of every message
pub const SENDER_TAG: &str = "[읽씹당했나]";

/// SMS service trait for sending text messages
///
/// Implementations include:
/// - Solapi messaging API
/// - Mock implementation for development
#[async_trait]
pub trait SmsService: Send + Sync {
    /// Send an SMS message to a phone number
    ///
    /// # Arguments
    ///
    /// * `phone_number` - The recipient's phone number (`010XXXXXXXX`, hyphens allowed)
    /// * `message` - The message content to send
    ///
    /// # Returns
    ///
    /// * `Ok(message_id)` - Identifier of the sent message
    /// * `Err(InfrastructureError)` - If sending fails
    async fn send_sms(&self, phone_number: &str, message: &str) -> Result<String, InfrastructureError>;

    /// Send a verification code via SMS
    ///
    /// Formats the code with [`verification_message`] using this gateway's
    /// Web OTP origin.
    async fn send_verification_code(&self, phone_number: &str, code: &str) -> Result<String, InfrastructureError> {
        let message = verification_message(code, self.web_otp_origin());
        self.send_sms(phone_number, &message).await
    }

    /// Origin appended for browser one-time-code autofill, if any
    fn web_otp_origin(&self) -> Option<&str> {
        None
    }

    /// Get the service provider name
    fn provider_name(&self) -> &str;

    /// Check if the service is available
    async fn is_available(&self) -> bool {
        true
    }
}

/// Render the verification SMS
///
/// With an origin, the message ends in the Web OTP line `@origin #code` so
/// mobile browsers can offer to fill the code.
pub fn verification_message(code: &str, web_otp_origin: Option<&str>) -> String {
    let mut message = format!("{} 인증번호: {}\n3분 내에 입력해주세요.", SENDER_TAG, code);
    if let Some(origin) = web_otp_origin {
        message.push_str(&format!("\n\n@{} #{}", origin, code));
    }
    message
}
