use serde::{Deserialize, Serialize};
use ssum_core::domain::entities::Purpose;
use validator::Validate;

/// Body of `POST /api/v1/auth/send-code`
///
/// `phone` may contain hyphens and spaces; the exact format is checked after
/// normalization.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendCodeRequest {
    #[validate(length(min = 10, max = 20))]
    pub phone: String,
    pub purpose: Purpose,
}

/// Body of `POST /api/v1/auth/verify-code`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyCodeRequest {
    #[validate(length(min = 10, max = 20))]
    pub phone: String,
    #[validate(length(min = 1, max = 16))]
    pub code: String,
    pub purpose: Purpose,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendCodeResponse {
    /// Code expiry as epoch milliseconds
    pub expires_at: i64,
    /// Seconds until another code can be requested
    pub resend_after: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyCodeResponse {
    pub verification_token: String,
}
