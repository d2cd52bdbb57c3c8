//! MySQL implementation of the AccountDirectory trait.
//!
//! Reads the `users` table owned by the account service; never writes to it.

use async_trait::async_trait;
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use ssum_core::domain::entities::{AccountProvider, AccountSummary};
use ssum_core::errors::DomainError;
use ssum_core::repositories::AccountDirectory;

use crate::database::connection::ping;

/// Account lookup over `users(id, phone, provider)`
pub struct MySqlAccountDirectory {
    pool: MySqlPool,
}

impl MySqlAccountDirectory {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_account(row: &sqlx::mysql::MySqlRow) -> Result<AccountSummary, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| DomainError::internal(format!("Failed to get id: {}", e)))?;
        let provider: Option<String> = row
            .try_get("provider")
            .map_err(|e| DomainError::internal(format!("Failed to get provider: {}", e)))?;

        Ok(AccountSummary {
            id: Uuid::parse_str(&id)
                .map_err(|e| DomainError::internal(format!("Invalid UUID: {}", e)))?,
            phone: row
                .try_get("phone")
                .map_err(|e| DomainError::internal(format!("Failed to get phone: {}", e)))?,
            // Accounts created before social login have no provider
            provider: provider
                .as_deref()
                .map(str::parse::<AccountProvider>)
                .transpose()
                .map_err(DomainError::internal)?
                .unwrap_or(AccountProvider::Local),
        })
    }
}

#[async_trait]
impl AccountDirectory for MySqlAccountDirectory {
    async fn find_by_phone(&self, phone: &str) -> Result<Option<AccountSummary>, DomainError> {
        let result = sqlx::query("SELECT id, phone, provider FROM users WHERE phone = ? LIMIT 1")
            .bind(phone)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::internal(format!("Database query failed: {}", e)))?;

        result.as_ref().map(Self::row_to_account).transpose()
    }

    async fn health_check(&self) -> Result<(), DomainError> {
        Ok(ping(&self.pool).await?)
    }
}
