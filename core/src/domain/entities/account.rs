//! Read-only view of a registered account, as needed by phone verification.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How an account signs in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountProvider {
    /// Phone number and password
    Local,
    /// Kakao OAuth; no password to reset
    Kakao,
}

impl AccountProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountProvider::Local => "local",
            AccountProvider::Kakao => "kakao",
        }
    }
}

impl std::str::FromStr for AccountProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(AccountProvider::Local),
            "kakao" => Ok(AccountProvider::Kakao),
            other => Err(format!("Unknown account provider: {}", other)),
        }
    }
}

/// The fields of an account the verification workflow looks at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub id: Uuid,
    pub phone: String,
    pub provider: AccountProvider,
}

impl AccountSummary {
    pub fn new(phone: impl Into<String>, provider: AccountProvider) -> Self {
        Self {
            id: Uuid::new_v4(),
            phone: phone.into(),
            provider,
        }
    }

    pub fn is_kakao(&self) -> bool {
        self.provider == AccountProvider::Kakao
    }
}
