//! Solapi SMS Service Implementation
//!
//! Sends messages through `POST /messages/v4/send`. Requests are signed with
//! the HMAC-SHA256 scheme: `signature = hex(HMAC_SHA256(secret, date + salt))`
//! where `date` is an ISO-8601 timestamp and `salt` is 32 random bytes in hex.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use hmac::{Hmac, Mac};
use rand::{rngs::OsRng, RngCore};
use reqwest::StatusCode;
use serde_json::{json, Value};
use sha2::Sha256;
use ssum_shared::phone::mask_phone_number;
use ssum_shared::SmsConfig;
use std::time::Duration;
use tracing::{debug, error, info};

use super::sms_service::SmsService;
use crate::InfrastructureError;

type HmacSha256 = Hmac<Sha256>;

const SEND_PATH: &str = "/messages/v4/send";

/// Solapi service configuration
#[derive(Debug, Clone)]
pub struct SolapiConfig {
    /// API key
    pub api_key: String,
    /// API secret used as the HMAC key
    pub api_secret: String,
    /// Registered sender number
    pub sender_phone: String,
    /// API base URL
    pub base_url: String,
    /// Timeout for API requests in seconds
    pub request_timeout_secs: u64,
    /// Origin for the Web OTP line
    pub web_otp_origin: Option<String>,
}

impl SolapiConfig {
    pub fn from_sms_config(config: &SmsConfig, web_otp_origin: Option<String>) -> Self {
        Self {
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            sender_phone: config.sender_phone.clone(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            request_timeout_secs: config.request_timeout_secs,
            web_otp_origin,
        }
    }
}

/// Solapi SMS service
pub struct SolapiSmsService {
    client: reqwest::Client,
    config: SolapiConfig,
}

impl SolapiSmsService {
    /// Create a new Solapi service
    ///
    /// Fails when the key or secret is empty.
    pub fn new(config: SolapiConfig) -> Result<Self, InfrastructureError> {
        if config.api_key.is_empty() || config.api_secret.is_empty() {
            return Err(InfrastructureError::Config(
                "Solapi API key and secret are required".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    fn send_url(&self) -> String {
        format!("{}{}", self.config.base_url, SEND_PATH)
    }

    fn authorization(&self) -> Result<String, InfrastructureError> {
        let date = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let mut salt = [0u8; 32];
        OsRng.fill_bytes(&mut salt);
        authorization_header(&self.config.api_key, &self.config.api_secret, &date, &hex::encode(salt))
    }
}

/// Compute the request signature
pub fn sign(secret: &str, date: &str, salt: &str) -> Result<String, InfrastructureError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| InfrastructureError::Sms(format!("Invalid signing key: {}", e)))?;
    mac.update(date.as_bytes());
    mac.update(salt.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Build the `Authorization` header value
pub fn authorization_header(
    api_key: &str,
    secret: &str,
    date: &str,
    salt: &str,
) -> Result<String, InfrastructureError> {
    let signature = sign(secret, date, salt)?;
    Ok(format!(
        "HMAC-SHA256 apiKey={}, date={}, salt={}, signature={}",
        api_key, date, salt, signature
    ))
}

/// Extract the message id from a send response, or the gateway's reason for failing
fn parse_send_response(status: StatusCode, text: &str, masked: &str) -> Result<String, InfrastructureError> {
    let result = match serde_json::from_str::<Value>(text) {
        Ok(value) => value,
        Err(e) if status.is_success() => {
            error!(
                phone = %masked,
                status = status.as_u16(),
                error = %e,
                event = "solapi_response_unreadable",
                "Solapi accepted the request but the response could not be decoded"
            );
            return Err(InfrastructureError::Sms(format!("Unreadable Solapi response: {}", e)));
        }
        Err(_) => Value::Null,
    };

    if !status.is_success() {
        let reason = result
            .get("errorMessage")
            .or_else(|| result.get("message"))
            .and_then(Value::as_str)
            .unwrap_or("SMS 발송 실패")
            .to_string();
        error!(
            phone = %masked,
            status = status.as_u16(),
            error = %reason,
            event = "solapi_send_failed",
            "Solapi rejected the message"
        );
        return Err(InfrastructureError::Sms(format!("Solapi error ({}): {}", status, reason)));
    }

    Ok(result
        .get("messageId")
        .or_else(|| result.get("groupId"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string())
}

#[async_trait]
impl SmsService for SolapiSmsService {
    async fn send_sms(&self, phone_number: &str, message: &str) -> Result<String, InfrastructureError> {
        let to = phone_number.replace('-', "");
        let masked = mask_phone_number(&to);

        debug!(phone = %masked, message_length = message.chars().count(), "Sending SMS via Solapi");

        let body = json!({
            "message": {
                "to": to,
                "from": self.config.sender_phone,
                "type": "SMS",
                "text": message,
            }
        });

        let response = self
            .client
            .post(self.send_url())
            .header("Authorization", self.authorization()?)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        let message_id = parse_send_response(status, &text, &masked)?;

        info!(phone = %masked, message_id = %message_id, "SMS sent via Solapi");
        Ok(message_id)
    }

    fn web_otp_origin(&self) -> Option<&str> {
        self.config.web_otp_origin.as_deref()
    }

    fn provider_name(&self) -> &str {
        "Solapi"
    }
}
