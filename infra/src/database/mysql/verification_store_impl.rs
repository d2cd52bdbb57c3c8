//! MySQL implementation of the VerificationStore trait.
//!
//! Requests live in `verification_requests` with a unique `(phone, purpose)`
//! key. Attempt updates and consumption are guarded by `WHERE id = ?` so a
//! superseded or already-consumed request is never touched.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use ssum_core::domain::entities::{Purpose, VerificationRequest, VerifiedToken};
use ssum_core::errors::DomainError;
use ssum_core::repositories::{PurgeStats, VerificationStore};

use crate::database::connection::ping;

/// MySQL implementation of VerificationStore
pub struct MySqlVerificationStore {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlVerificationStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn query_error(e: sqlx::Error) -> DomainError {
        DomainError::internal(format!("Database query failed: {}", e))
    }

    fn parse_purpose(value: &str) -> Result<Purpose, DomainError> {
        value
            .parse::<Purpose>()
            .map_err(|e| DomainError::internal(format!("Invalid purpose column: {}", e)))
    }

    /// Convert database row to VerificationRequest entity
    fn row_to_request(row: &sqlx::mysql::MySqlRow) -> Result<VerificationRequest, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| DomainError::internal(format!("Failed to get id: {}", e)))?;
        let purpose: String = row
            .try_get("purpose")
            .map_err(|e| DomainError::internal(format!("Failed to get purpose: {}", e)))?;

        Ok(VerificationRequest {
            id: Uuid::parse_str(&id)
                .map_err(|e| DomainError::internal(format!("Invalid UUID: {}", e)))?,
            phone: row
                .try_get("phone")
                .map_err(|e| DomainError::internal(format!("Failed to get phone: {}", e)))?,
            purpose: Self::parse_purpose(&purpose)?,
            code: row
                .try_get("code")
                .map_err(|e| DomainError::internal(format!("Failed to get code: {}", e)))?,
            attempts: row
                .try_get("attempts")
                .map_err(|e| DomainError::internal(format!("Failed to get attempts: {}", e)))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| DomainError::internal(format!("Failed to get created_at: {}", e)))?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| DomainError::internal(format!("Failed to get expires_at: {}", e)))?,
        })
    }

    /// Convert database row to VerifiedToken entity
    fn row_to_token(row: &sqlx::mysql::MySqlRow) -> Result<VerifiedToken, DomainError> {
        let purpose: String = row
            .try_get("purpose")
            .map_err(|e| DomainError::internal(format!("Failed to get purpose: {}", e)))?;

        Ok(VerifiedToken {
            token: row
                .try_get("token")
                .map_err(|e| DomainError::internal(format!("Failed to get token: {}", e)))?,
            phone: row
                .try_get("phone")
                .map_err(|e| DomainError::internal(format!("Failed to get phone: {}", e)))?,
            purpose: Self::parse_purpose(&purpose)?,
            issued_at: row
                .try_get::<DateTime<Utc>, _>("issued_at")
                .map_err(|e| DomainError::internal(format!("Failed to get issued_at: {}", e)))?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| DomainError::internal(format!("Failed to get expires_at: {}", e)))?,
        })
    }
}

#[async_trait]
impl VerificationStore for MySqlVerificationStore {
    async fn find_request(
        &self,
        phone: &str,
        purpose: Purpose,
    ) -> Result<Option<VerificationRequest>, DomainError> {
        let query = r#"
            SELECT id, phone, purpose, code, attempts, created_at, expires_at
            FROM verification_requests
            WHERE phone = ? AND purpose = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(phone)
            .bind(purpose.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(Self::query_error)?;

        result.as_ref().map(Self::row_to_request).transpose()
    }

    async fn save_request(&self, request: &VerificationRequest) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(Self::query_error)?;

        sqlx::query(
            r#"
            INSERT INTO verification_requests
                (id, phone, purpose, code, attempts, created_at, expires_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                id = VALUES(id),
                code = VALUES(code),
                attempts = VALUES(attempts),
                created_at = VALUES(created_at),
                expires_at = VALUES(expires_at)
            "#,
        )
        .bind(request.id.to_string())
        .bind(&request.phone)
        .bind(request.purpose.as_str())
        .bind(&request.code)
        .bind(request.attempts)
        .bind(request.created_at)
        .bind(request.expires_at)
        .execute(&mut *tx)
        .await
        .map_err(Self::query_error)?;

        sqlx::query(
            r#"
            INSERT INTO verification_issuances (phone, purpose, issued_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&request.phone)
        .bind(request.purpose.as_str())
        .bind(request.created_at)
        .execute(&mut *tx)
        .await
        .map_err(Self::query_error)?;

        tx.commit().await.map_err(Self::query_error)?;
        Ok(())
    }

    async fn record_failed_attempt(
        &self,
        request: &VerificationRequest,
    ) -> Result<Option<i32>, DomainError> {
        let id = request.id.to_string();
        let mut tx = self.pool.begin().await.map_err(Self::query_error)?;

        let updated = sqlx::query("UPDATE verification_requests SET attempts = attempts + 1 WHERE id = ?")
            .bind(&id)
            .execute(&mut *tx)
            .await
            .map_err(Self::query_error)?;

        if updated.rows_affected() == 0 {
            tx.rollback().await.map_err(Self::query_error)?;
            return Ok(None);
        }

        let row = sqlx::query("SELECT attempts FROM verification_requests WHERE id = ?")
            .bind(&id)
            .fetch_one(&mut *tx)
            .await
            .map_err(Self::query_error)?;
        let attempts: i32 = row
            .try_get("attempts")
            .map_err(|e| DomainError::internal(format!("Failed to get attempts: {}", e)))?;

        tx.commit().await.map_err(Self::query_error)?;
        Ok(Some(attempts))
    }

    async fn consume_request(&self, request: &VerificationRequest) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM verification_requests WHERE id = ?")
            .bind(request.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(Self::query_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_issued_since(
        &self,
        phone: &str,
        since: DateTime<Utc>,
    ) -> Result<u32, DomainError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS issued FROM verification_issuances WHERE phone = ? AND issued_at >= ?",
        )
        .bind(phone)
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(Self::query_error)?;

        let issued: i64 = row
            .try_get("issued")
            .map_err(|e| DomainError::internal(format!("Failed to get issued count: {}", e)))?;
        Ok(u32::try_from(issued).unwrap_or(u32::MAX))
    }

    async fn last_issued_at(
        &self,
        phone: &str,
        purpose: Purpose,
    ) -> Result<Option<DateTime<Utc>>, DomainError> {
        let row = sqlx::query(
            "SELECT MAX(issued_at) AS last_issued FROM verification_issuances WHERE phone = ? AND purpose = ?",
        )
        .bind(phone)
        .bind(purpose.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(Self::query_error)?;

        row.try_get::<Option<DateTime<Utc>>, _>("last_issued")
            .map_err(|e| DomainError::internal(format!("Failed to get last_issued: {}", e)))
    }

    async fn save_token(&self, token: &VerifiedToken) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO verified_tokens (token, phone, purpose, issued_at, expires_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&token.token)
        .bind(&token.phone)
        .bind(token.purpose.as_str())
        .bind(token.issued_at)
        .bind(token.expires_at)
        .execute(&self.pool)
        .await
        .map_err(Self::query_error)?;

        Ok(())
    }

    async fn find_token(&self, token: &str) -> Result<Option<VerifiedToken>, DomainError> {
        let result = sqlx::query(
            "SELECT token, phone, purpose, issued_at, expires_at FROM verified_tokens WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(Self::query_error)?;

        result.as_ref().map(Self::row_to_token).transpose()
    }

    async fn delete_token(&self, token: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM verified_tokens WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(Self::query_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn purge_expired(
        &self,
        now: DateTime<Utc>,
        issuance_cutoff: DateTime<Utc>,
    ) -> Result<PurgeStats, DomainError> {
        let requests = sqlx::query("DELETE FROM verification_requests WHERE expires_at < ?")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(Self::query_error)?
            .rows_affected();

        let tokens = sqlx::query("DELETE FROM verified_tokens WHERE expires_at < ?")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(Self::query_error)?
            .rows_affected();

        let issuances = sqlx::query("DELETE FROM verification_issuances WHERE issued_at < ?")
            .bind(issuance_cutoff)
            .execute(&self.pool)
            .await
            .map_err(Self::query_error)?
            .rows_affected();

        Ok(PurgeStats {
            requests,
            tokens,
            issuances,
        })
    }

    async fn health_check(&self) -> Result<(), DomainError> {
        Ok(ping(&self.pool).await?)
    }
}
