//! Phone-auth workflow module
//!
//! Composes the verification service with SMS delivery and the account
//! directory into the send-code, verify-code, and token redemption use cases.

mod service;
mod traits;
mod types;


pub use service::PhoneAuthService;
pub use traits::SmsSenderTrait;
pub use types::{HealthReport, SendCodeResult};
