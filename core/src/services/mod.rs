//! Business services containing domain logic and use cases.

pub mod phone_auth;
pub mod verification;

// Re-export commonly used types
pub use phone_auth::{HealthReport, PhoneAuthService, SendCodeResult, SmsSenderTrait};
pub use verification::{
    IssueCheck, IssuedCode, ReaperHandle, VerificationReaper, VerificationService,
    VerificationServiceConfig, VerifyCodeResult,
};
