//! Verification request entity for SMS-based phone ownership checks.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, Rng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of wrong submissions allowed per code
pub const MAX_ATTEMPTS: i32 = 5;

/// Length of the verification code
pub const CODE_LENGTH: usize = 6;

/// Default expiration time for verification codes (3 minutes)
pub const DEFAULT_EXPIRATION_SECONDS: i64 = 180;

/// Why a phone is being verified
///
/// A code or token issued for one purpose is never accepted for the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Purpose {
    /// New account registration
    Signup,
    /// Password reset for an existing account
    Reset,
}

impl Purpose {
    pub const ALL: [Purpose; 2] = [Purpose::Signup, Purpose::Reset];

    pub fn as_str(&self) -> &'static str {
        match self {
            Purpose::Signup => "signup",
            Purpose::Reset => "reset",
        }
    }
}

impl std::fmt::Display for Purpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Purpose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "signup" => Ok(Purpose::Signup),
            "reset" => Ok(Purpose::Reset),
            other => Err(format!("Invalid verification purpose: {}", other)),
        }
    }
}

/// An issued, not yet consumed verification code
///
/// At most one exists per `(phone, purpose)`; issuing again replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRequest {
    /// Identifier used to detect that a request was superseded
    pub id: Uuid,

    /// Normalized phone number (`010XXXXXXXX`)
    pub phone: String,

    /// Workflow this code belongs to
    pub purpose: Purpose,

    /// The 6-digit verification code, zero padded
    pub code: String,

    /// Number of wrong submissions so far
    pub attempts: i32,

    /// Timestamp when the code was issued
    pub created_at: DateTime<Utc>,

    /// Timestamp when the code expires
    pub expires_at: DateTime<Utc>,
}

impl VerificationRequest {
    /// Creates a new request with a fresh random code
    ///
    /// # Arguments
    ///
    /// * `phone` - Normalized phone number
    /// * `purpose` - Workflow the code is issued for
    /// * `ttl` - How long the code stays valid
    pub fn new(phone: String, purpose: Purpose, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            phone,
            purpose,
            code: Self::generate_code(),
            attempts: 0,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    /// Generates a uniformly distributed 6-digit code from the OS CSPRNG
    ///
    /// Leading zeros are kept, so the result is always exactly six characters.
    pub fn generate_code() -> String {
        let code: u32 = OsRng.gen_range(0..1_000_000);
        format!("{:06}", code)
    }

    /// Checks if the code has expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Checks if no wrong submissions remain
    pub fn is_exhausted(&self, max_attempts: i32) -> bool {
        self.attempts >= max_attempts
    }

    /// Compares a submitted code in constant time
    pub fn matches(&self, submitted: &str) -> bool {
        if self.code.len() != submitted.len() {
            return false;
        }
        constant_time_eq(self.code.as_bytes(), submitted.as_bytes())
    }

    /// Remaining wrong submissions (0 if exhausted)
    pub fn remaining_attempts(&self, max_attempts: i32) -> i32 {
        (max_attempts - self.attempts).max(0)
    }

    /// Time left before expiry, or zero if already expired
    pub fn time_until_expiration(&self, now: DateTime<Utc>) -> Duration {
        if self.expires_at > now {
            self.expires_at - now
        } else {
            Duration::zero()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn request() -> VerificationRequest {
        VerificationRequest::new(
            "01099998888".to_string(),
            Purpose::Signup,
            Duration::seconds(DEFAULT_EXPIRATION_SECONDS),
        )
    }

    #[test]
    fn test_new_request() {
        let request = request();

        assert_eq!(request.phone, "01099998888");
        assert_eq!(request.purpose, Purpose::Signup);
        assert_eq!(request.code.len(), CODE_LENGTH);
        assert_eq!(request.attempts, 0);
        assert_eq!(
            request.expires_at - request.created_at,
            Duration::seconds(DEFAULT_EXPIRATION_SECONDS)
        );
        assert!(!request.is_expired_at(Utc::now()));
    }

    #[test]
    fn test_generate_code_format() {
        for _ in 0..200 {
            let code = VerificationRequest::generate_code();
            assert_eq!(code.len(), CODE_LENGTH);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_code_uniqueness() {
        let codes: HashSet<String> = (0..100)
            .map(|_| VerificationRequest::generate_code())
            .collect();
        assert!(codes.len() > 1);
    }

    #[test]
    fn test_matches() {
        let mut request = request();
        request.code = "012345".to_string();

        assert!(request.matches("012345"));
        assert!(!request.matches("12345"));
        assert!(!request.matches("012346"));
        assert!(!request.matches(""));
    }

    #[test]
    fn test_expiry_boundary() {
        let request = request();
        assert!(!request.is_expired_at(request.expires_at));
        assert!(request.is_expired_at(request.expires_at + Duration::milliseconds(1)));
        assert_eq!(
            request.time_until_expiration(request.expires_at + Duration::seconds(5)),
            Duration::zero()
        );
    }

    #[test]
    fn test_remaining_attempts() {
        let mut request = request();
        assert_eq!(request.remaining_attempts(MAX_ATTEMPTS), MAX_ATTEMPTS);

        request.attempts = 4;
        assert_eq!(request.remaining_attempts(MAX_ATTEMPTS), 1);
        assert!(!request.is_exhausted(MAX_ATTEMPTS));

        request.attempts = 7;
        assert_eq!(request.remaining_attempts(MAX_ATTEMPTS), 0);
        assert!(request.is_exhausted(MAX_ATTEMPTS));
    }

    #[test]
    fn test_purpose_round_trip_through_str() {
        for purpose in Purpose::ALL {
            assert_eq!(purpose.as_str().parse::<Purpose>(), Ok(purpose));
        }
        assert!("login".parse::<Purpose>().is_err());
        assert_eq!(serde_json::to_string(&Purpose::Reset).unwrap(), "\"reset\"");
    }
}
