//! Request and response bodies

pub mod auth;

pub use auth::{SendCodeRequest, SendCodeResponse, VerifyCodeRequest, VerifyCodeResponse};
