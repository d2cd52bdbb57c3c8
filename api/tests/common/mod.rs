//! Shared fixtures for the HTTP tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use actix_web::web;
use ssum_api::AppState;
use ssum_core::domain::entities::{AccountProvider, AccountSummary};
use ssum_core::repositories::{InMemoryAccountDirectory, InMemoryVerificationStore};
use ssum_core::services::{PhoneAuthService, SmsSenderTrait, VerificationService, VerificationServiceConfig};
use ssum_shared::StorageBackend;

pub type TestState = AppState<InMemoryVerificationStore, RecordingSms, InMemoryAccountDirectory>;

/// SMS sender that keeps the last code per phone
#[derive(Default)]
pub struct RecordingSms {
    inbox: Mutex<HashMap<String, String>>,
    fail: bool,
}

impl RecordingSms {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn last_code(&self, phone: &str) -> Option<String> {
        self.inbox.lock().unwrap().get(phone).cloned()
    }
}

#[async_trait]
impl SmsSenderTrait for RecordingSms {
    async fn send_verification_code(&self, phone: &str, code: &str) -> Result<String, String> {
        if self.fail {
            return Err("gateway unavailable".to_string());
        }
        self.inbox
            .lock()
            .unwrap()
            .insert(phone.to_string(), code.to_string());
        Ok(format!("msg_{}", phone))
    }

    async fn is_available(&self) -> bool {
        !self.fail
    }
}

pub struct Fixture {
    pub state: web::Data<TestState>,
    pub sms: Arc<RecordingSms>,
    pub accounts: Arc<InMemoryAccountDirectory>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with(VerificationServiceConfig::default(), RecordingSms::default())
    }

    pub fn with(config: VerificationServiceConfig, sms: RecordingSms) -> Self {
        let store = Arc::new(InMemoryVerificationStore::new());
        let verification = Arc::new(VerificationService::new(store, config));
        let sms = Arc::new(sms);
        let accounts = Arc::new(InMemoryAccountDirectory::new());
        let auth_service = Arc::new(PhoneAuthService::new(verification, sms.clone(), accounts.clone()));

        Self {
            state: web::Data::new(AppState::new(auth_service, StorageBackend::Memory)),
            sms,
            accounts,
        }
    }

    pub async fn register(&self, phone: &str, provider: AccountProvider) {
        self.accounts.insert(AccountSummary::new(phone, provider)).await;
    }
}
