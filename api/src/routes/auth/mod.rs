//! Phone verification route handlers
//!
//! - `POST /api/v1/auth/send-code` - issue and deliver a code
//! - `POST /api/v1/auth/verify-code` - check a code and mint a verification token

pub mod send_code;
pub mod verify_code;

use std::sync::Arc;

use ssum_core::repositories::{AccountDirectory, VerificationStore};
use ssum_core::services::{PhoneAuthService, SmsSenderTrait};
use ssum_shared::StorageBackend;

/// Application state that holds shared services
pub struct AppState<S, M, A>
where
    S: VerificationStore,
    M: SmsSenderTrait,
    A: AccountDirectory,
{
    pub auth_service: Arc<PhoneAuthService<S, M, A>>,
    /// Reported by the health endpoint
    pub storage_backend: StorageBackend,
}

impl<S, M, A> AppState<S, M, A>
where
    S: VerificationStore,
    M: SmsSenderTrait,
    A: AccountDirectory,
{
    pub fn new(auth_service: Arc<PhoneAuthService<S, M, A>>, storage_backend: StorageBackend) -> Self {
        Self {
            auth_service,
            storage_backend,
        }
    }
}
