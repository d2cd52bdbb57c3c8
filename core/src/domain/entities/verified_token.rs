//! Verified token entity: proof of phone ownership handed to account workflows.

use chrono::{DateTime, Duration, Utc};
use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};
use serde::{Deserialize, Serialize};

use super::verification_request::Purpose;

/// Length of a verification token
pub const TOKEN_LENGTH: usize = 32;

/// Default lifetime of a verification token (10 minutes)
pub const DEFAULT_TOKEN_EXPIRATION_SECONDS: i64 = 600;

/// Single-use token minted after a correct code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedToken {
    /// Opaque random value presented by the client
    pub token: String,

    /// Phone number the token proves ownership of
    pub phone: String,

    /// Workflow the token may be redeemed for
    pub purpose: Purpose,

    /// Timestamp when the token was minted
    pub issued_at: DateTime<Utc>,

    /// Timestamp after which the token is rejected
    pub expires_at: DateTime<Utc>,
}

impl VerifiedToken {
    /// Mints a token bound to `phone` and `purpose`
    pub fn new(phone: String, purpose: Purpose, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            token: Self::generate_token(),
            phone,
            purpose,
            issued_at: now,
            expires_at: now + ttl,
        }
    }

    /// Generates a 32-character alphanumeric token from the OS CSPRNG
    pub fn generate_token() -> String {
        OsRng
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LENGTH)
            .map(char::from)
            .collect()
    }

    /// Checks if the token has expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Checks the token was issued for exactly this phone and purpose
    pub fn is_bound_to(&self, phone: &str, purpose: Purpose) -> bool {
        self.phone == phone && self.purpose == purpose
    }
}
