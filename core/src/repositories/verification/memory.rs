//! In-memory verification store
//!
//! Ephemeral: everything is lost on restart. Suitable for tests and
//! single-process deployments.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::{Purpose, VerificationRequest, VerifiedToken};
use crate::errors::DomainError;

use super::r#trait::{PurgeStats, VerificationStore};

#[derive(Debug, Clone)]
struct Issuance {
    purpose: Purpose,
    issued_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct MemoryState {
    requests: HashMap<(String, Purpose), VerificationRequest>,
    issuances: HashMap<String, Vec<Issuance>>,
    tokens: HashMap<String, VerifiedToken>,
}

/// Verification store backed by process memory
///
/// Cloning yields a handle to the same underlying state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryVerificationStore {
    state: Arc<RwLock<MemoryState>>,
}

impl InMemoryVerificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of active requests, expired ones included
    pub async fn request_count(&self) -> usize {
        self.state.read().await.requests.len()
    }

    /// Number of stored tokens, expired ones included
    pub async fn token_count(&self) -> usize {
        self.state.read().await.tokens.len()
    }

    /// Number of issuance log entries across all phones
    pub async fn issuance_count(&self) -> usize {
        self.state.read().await.issuances.values().map(Vec::len).sum()
    }
}

#[async_trait]
impl VerificationStore for InMemoryVerificationStore {
    async fn find_request(
        &self,
        phone: &str,
        purpose: Purpose,
    ) -> Result<Option<VerificationRequest>, DomainError> {
        let state = self.state.read().await;
        Ok(state.requests.get(&(phone.to_string(), purpose)).cloned())
    }

    async fn save_request(&self, request: &VerificationRequest) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        state
            .requests
            .insert((request.phone.clone(), request.purpose), request.clone());
        state
            .issuances
            .entry(request.phone.clone())
            .or_default()
            .push(Issuance {
                purpose: request.purpose,
                issued_at: request.created_at,
            });
        Ok(())
    }

    async fn record_failed_attempt(
        &self,
        request: &VerificationRequest,
    ) -> Result<Option<i32>, DomainError> {
        let mut state = self.state.write().await;
        match state
            .requests
            .get_mut(&(request.phone.clone(), request.purpose))
        {
            Some(stored) if stored.id == request.id => {
                stored.attempts += 1;
                Ok(Some(stored.attempts))
            }
            _ => Ok(None),
        }
    }

    async fn consume_request(&self, request: &VerificationRequest) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        let key = (request.phone.clone(), request.purpose);
        match state.requests.get(&key) {
            Some(stored) if stored.id == request.id => {
                state.requests.remove(&key);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn count_issued_since(
        &self,
        phone: &str,
        since: DateTime<Utc>,
    ) -> Result<u32, DomainError> {
        let state = self.state.read().await;
        let count = state
            .issuances
            .get(phone)
            .map(|log| log.iter().filter(|i| i.issued_at >= since).count())
            .unwrap_or(0);
        Ok(count as u32)
    }

    async fn last_issued_at(
        &self,
        phone: &str,
        purpose: Purpose,
    ) -> Result<Option<DateTime<Utc>>, DomainError> {
        let state = self.state.read().await;
        Ok(state.issuances.get(phone).and_then(|log| {
            log.iter()
                .filter(|i| i.purpose == purpose)
                .map(|i| i.issued_at)
                .max()
        }))
    }

    async fn save_token(&self, token: &VerifiedToken) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        state.tokens.insert(token.token.clone(), token.clone());
        Ok(())
    }

    async fn find_token(&self, token: &str) -> Result<Option<VerifiedToken>, DomainError> {
        let state = self.state.read().await;
        Ok(state.tokens.get(token).cloned())
    }

    async fn delete_token(&self, token: &str) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        Ok(state.tokens.remove(token).is_some())
    }

    async fn purge_expired(
        &self,
        now: DateTime<Utc>,
        issuance_cutoff: DateTime<Utc>,
    ) -> Result<PurgeStats, DomainError> {
        let mut state = self.state.write().await;
        let mut stats = PurgeStats::default();

        let before = state.requests.len();
        state.requests.retain(|_, r| !r.is_expired_at(now));
        stats.requests = (before - state.requests.len()) as u64;

        let before = state.tokens.len();
        state.tokens.retain(|_, t| !t.is_expired_at(now));
        stats.tokens = (before - state.tokens.len()) as u64;

        for log in state.issuances.values_mut() {
            let before = log.len();
            log.retain(|i| i.issued_at >= issuance_cutoff);
            stats.issuances += (before - log.len()) as u64;
        }
        state.issuances.retain(|_, log| !log.is_empty());

        Ok(stats)
    }
}
