//! Domain entities representing core business objects.

pub mod account;
pub mod verification_request;
pub mod verified_token;

// Re-export commonly used types
pub use account::{AccountProvider, AccountSummary};
pub use verification_request::{
    Purpose, VerificationRequest, CODE_LENGTH, DEFAULT_EXPIRATION_SECONDS, MAX_ATTEMPTS,
};
pub use verified_token::{VerifiedToken, DEFAULT_TOKEN_EXPIRATION_SECONDS, TOKEN_LENGTH};
