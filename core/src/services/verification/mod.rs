//! Verification service module for SMS-based phone ownership checks
//!
//! This module provides the code and token lifecycle:
//! - Daily send limit and per-purpose resend cooldown
//! - Code issuance, verification, and attempt tracking
//! - Single-use verified tokens
//! - A background reaper that sweeps expired state

mod config;
mod reaper;
mod service;
mod types;

#[cfg(test)]
mod tests;

pub use config::VerificationServiceConfig;
pub use reaper::{ReaperHandle, VerificationReaper};
pub use service::VerificationService;
pub use types::{IssueCheck, IssuedCode, VerifyCodeResult};
