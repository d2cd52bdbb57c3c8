//! SMS gateway configuration

use serde::{Deserialize, Serialize};

/// SMS service provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SmsProvider {
    /// Logs messages instead of sending them
    #[default]
    Mock,
    /// Solapi messaging API
    Solapi,
}

impl std::str::FromStr for SmsProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mock" | "console" => Ok(SmsProvider::Mock),
            "solapi" => Ok(SmsProvider::Solapi),
            _ => Err(format!("Invalid SMS provider: {}", s)),
        }
    }
}

/// SMS service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SmsConfig {
    /// Which gateway delivers messages
    pub provider: SmsProvider,
    /// API key
    pub api_key: String,
    /// API secret used to sign requests
    pub api_secret: String,
    /// Registered sender number
    pub sender_phone: String,
    /// Base URL of the messaging API
    pub api_base_url: String,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            provider: SmsProvider::Mock,
            api_key: String::new(),
            api_secret: String::new(),
            sender_phone: String::from("01012345678"),
            api_base_url: String::from("https://api.solapi.com"),
            request_timeout_secs: 10,
        }
    }
}

impl SmsConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let trimmed = |key: &str| std::env::var(key).map(|v| v.trim().to_string()).ok();

        Self {
            provider: super::env_or("SMS_PROVIDER", defaults.provider),
            api_key: trimmed("SOLAPI_API_KEY").unwrap_or_default(),
            api_secret: trimmed("SOLAPI_API_SECRET").unwrap_or_default(),
            sender_phone: trimmed("SOLAPI_SENDER_PHONE").unwrap_or(defaults.sender_phone),
            api_base_url: trimmed("SOLAPI_BASE_URL").unwrap_or(defaults.api_base_url),
            request_timeout_secs: super::env_or("SMS_REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs),
        }
    }

    /// Whether credentials are present for a real gateway
    pub fn has_credentials(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}
