//! In-memory account directory

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::AccountSummary;
use crate::errors::DomainError;

use super::r#trait::AccountDirectory;

/// Account directory backed by a map keyed on phone number
#[derive(Debug, Clone, Default)]
pub struct InMemoryAccountDirectory {
    accounts: Arc<RwLock<HashMap<String, AccountSummary>>>,
}

impl InMemoryAccountDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account, replacing any account with the same phone
    pub async fn insert(&self, account: AccountSummary) {
        self.accounts
            .write()
            .await
            .insert(account.phone.clone(), account);
    }
}

#[async_trait]
impl AccountDirectory for InMemoryAccountDirectory {
    async fn find_by_phone(&self, phone: &str) -> Result<Option<AccountSummary>, DomainError> {
        Ok(self.accounts.read().await.get(phone).cloned())
    }
}
