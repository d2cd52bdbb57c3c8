//! SMS Service Module
//!
//! SMS gateways for delivering verification codes:
//!
//! - **SMS Service Trait**: Common interface for all providers
//! - **Mock Implementation**: Logs messages for development
//! - **Solapi**: Production SMS via the Solapi API
//! - **Adapter**: Exposes a gateway as the core `SmsSenderTrait`

pub mod adapter;
pub mod mock_sms;
pub mod sms_service;
pub mod solapi;

pub use adapter::SmsServiceAdapter;
pub use mock_sms::MockSmsService;
pub use sms_service::{verification_message, SmsService};
pub use solapi::{SolapiConfig, SolapiSmsService};

use ssum_shared::config::SmsProvider;
use ssum_shared::SmsConfig;

#[cfg(test)]
mod tests;

/// Create an SMS service based on configuration
///
/// Solapi without usable credentials falls back to the mock service, so a
/// development machine without secrets still works.
pub fn create_sms_service(config: &SmsConfig, web_otp_origin: Option<String>) -> Box<dyn SmsService> {
    match config.provider {
        SmsProvider::Mock => Box::new(MockSmsService::new().with_web_otp_origin(web_otp_origin)),
        SmsProvider::Solapi => {
            if config.api_secret.is_empty() {
                tracing::warn!("Solapi secret not configured, falling back to mock SMS service");
                return Box::new(MockSmsService::new().with_web_otp_origin(web_otp_origin));
            }

            let solapi_config = SolapiConfig::from_sms_config(config, web_otp_origin.clone());
            match SolapiSmsService::new(solapi_config) {
                Ok(service) => Box::new(service),
                Err(e) => {
                    tracing::error!("Failed to initialize Solapi SMS service: {}", e);
                    tracing::warn!("Falling back to mock SMS service");
                    Box::new(MockSmsService::new().with_web_otp_origin(web_otp_origin))
                }
            }
        }
    }
}
