//! Redis implementation of the VerificationStore trait.
//!
//! Requests are hashes keyed by phone and purpose. Attempt counting and
//! consumption run as Lua scripts that compare the stored request id first,
//! so a superseded request is never modified. Tokens rely on native key
//! expiry; the sweeper only clears requests and old issuances.

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use redis::Script;
use std::collections::HashMap;
use uuid::Uuid;

use ssum_core::domain::entities::{Purpose, VerificationRequest, VerifiedToken};
use ssum_core::errors::DomainError;
use ssum_core::repositories::{PurgeStats, VerificationStore};

use super::keys;
use super::redis_client::RedisClient;
use crate::InfrastructureError;

/// How long a request hash outlives its code, so late submissions still see `Expired`
const REQUEST_RETENTION_SECONDS: i64 = 600;

/// Keys fetched per SCAN round
const SCAN_BATCH: u32 = 200;

const RECORD_ATTEMPT_SCRIPT: &str = r#"
if redis.call('HGET', KEYS[1], 'id') == ARGV[1] then
    return redis.call('HINCRBY', KEYS[1], 'attempts', 1)
end
return -1
"#;

const CONSUME_SCRIPT: &str = r#"
if redis.call('HGET', KEYS[1], 'id') == ARGV[1] then
    return redis.call('DEL', KEYS[1])
end
return 0
"#;

const PURGE_REQUEST_SCRIPT: &str = r#"
local expires_at = redis.call('HGET', KEYS[1], 'expires_at')
if expires_at and tonumber(expires_at) < tonumber(ARGV[1]) then
    return redis.call('DEL', KEYS[1])
end
return 0
"#;

/// Redis implementation of VerificationStore
pub struct RedisVerificationStore {
    client: RedisClient,
    /// Lifetime of an issuance log key after its latest entry
    issuance_ttl_seconds: u64,
    record_attempt: Script,
    consume: Script,
    purge_request: Script,
}

impl RedisVerificationStore {
    /// Create a store; `issuance_ttl_seconds` should cover the daily send window
    pub fn new(client: RedisClient, issuance_ttl_seconds: u64) -> Self {
        Self {
            client,
            issuance_ttl_seconds: issuance_ttl_seconds.max(1),
            record_attempt: Script::new(RECORD_ATTEMPT_SCRIPT),
            consume: Script::new(CONSUME_SCRIPT),
            purge_request: Script::new(PURGE_REQUEST_SCRIPT),
        }
    }

    fn prefix(&self) -> &str {
        self.client.key_prefix()
    }

    fn millis_to_datetime(millis: i64) -> Result<DateTime<Utc>, DomainError> {
        Utc.timestamp_millis_opt(millis)
            .single()
            .ok_or_else(|| DomainError::internal(format!("Invalid timestamp: {}", millis)))
    }

    fn hash_to_request(
        phone: &str,
        purpose: Purpose,
        fields: &HashMap<String, String>,
    ) -> Result<VerificationRequest, DomainError> {
        let field = |name: &str| {
            fields
                .get(name)
                .ok_or_else(|| DomainError::internal(format!("Missing request field: {}", name)))
        };
        let number = |name: &str| -> Result<i64, DomainError> {
            field(name)?
                .parse()
                .map_err(|e| DomainError::internal(format!("Invalid request field {}: {}", name, e)))
        };

        Ok(VerificationRequest {
            id: Uuid::parse_str(field("id")?)
                .map_err(|e| DomainError::internal(format!("Invalid UUID: {}", e)))?,
            phone: phone.to_string(),
            purpose,
            code: field("code")?.clone(),
            attempts: i32::try_from(number("attempts")?)
                .map_err(|e| DomainError::internal(format!("Invalid attempts: {}", e)))?,
            created_at: Self::millis_to_datetime(number("created_at")?)?,
            expires_at: Self::millis_to_datetime(number("expires_at")?)?,
        })
    }

    /// Collect every key matching `pattern` with SCAN
    async fn scan_keys(&self, pattern: &str) -> Result<Vec<String>, InfrastructureError> {
        let mut cursor: u64 = 0;
        let mut found = Vec::new();

        loop {
            let (next, batch) = self
                .client
                .execute_with_retry(|mut conn| {
                    let pattern = pattern.to_string();
                    Box::pin(async move {
                        redis::cmd("SCAN")
                            .cursor_arg(cursor)
                            .arg("MATCH")
                            .arg(pattern)
                            .arg("COUNT")
                            .arg(SCAN_BATCH)
                            .query_async::<_, (u64, Vec<String>)>(&mut conn)
                            .await
                    })
                })
                .await?;

            found.extend(batch);
            if next == 0 {
                return Ok(found);
            }
            cursor = next;
        }
    }
}

#[async_trait]
impl VerificationStore for RedisVerificationStore {
    async fn find_request(
        &self,
        phone: &str,
        purpose: Purpose,
    ) -> Result<Option<VerificationRequest>, DomainError> {
        let key = keys::request_key(self.prefix(), phone, purpose);

        let fields = self
            .client
            .execute_with_retry(|mut conn| {
                let key = key.clone();
                Box::pin(async move {
                    redis::cmd("HGETALL")
                        .arg(key)
                        .query_async::<_, HashMap<String, String>>(&mut conn)
                        .await
                })
            })
            .await
            .map_err(InfrastructureError::from)?;

        if fields.is_empty() {
            return Ok(None);
        }
        Self::hash_to_request(phone, purpose, &fields).map(Some)
    }

    async fn save_request(&self, request: &VerificationRequest) -> Result<(), DomainError> {
        let request_key = keys::request_key(self.prefix(), &request.phone, request.purpose);
        let issuance_key = keys::issuance_key(self.prefix(), &request.phone);
        let id = request.id.to_string();
        let created_ms = request.created_at.timestamp_millis();
        let retain_until_ms =
            (request.expires_at + Duration::seconds(REQUEST_RETENTION_SECONDS)).timestamp_millis();

        let mut pipe = redis::pipe();
        pipe.atomic()
            .cmd("DEL")
            .arg(&request_key)
            .ignore()
            .cmd("HSET")
            .arg(&request_key)
            .arg("id")
            .arg(&id)
            .arg("code")
            .arg(&request.code)
            .arg("attempts")
            .arg(request.attempts)
            .arg("created_at")
            .arg(created_ms)
            .arg("expires_at")
            .arg(request.expires_at.timestamp_millis())
            .ignore()
            .cmd("PEXPIREAT")
            .arg(&request_key)
            .arg(retain_until_ms)
            .ignore()
            .cmd("ZADD")
            .arg(&issuance_key)
            .arg(created_ms)
            .arg(keys::issuance_member(request.purpose, &id))
            .ignore()
            .cmd("EXPIRE")
            .arg(&issuance_key)
            .arg(self.issuance_ttl_seconds)
            .ignore();

        self.client
            .execute_with_retry(|mut conn| {
                let pipe = pipe.clone();
                Box::pin(async move { pipe.query_async::<_, ()>(&mut conn).await })
            })
            .await
            .map_err(InfrastructureError::from)?;

        Ok(())
    }

    async fn record_failed_attempt(
        &self,
        request: &VerificationRequest,
    ) -> Result<Option<i32>, DomainError> {
        let key = keys::request_key(self.prefix(), &request.phone, request.purpose);
        let id = request.id.to_string();

        let attempts = self
            .client
            .execute_with_retry(|mut conn| {
                let script = self.record_attempt.clone();
                let key = key.clone();
                let id = id.clone();
                Box::pin(async move {
                    let attempts: i64 = script.key(key).arg(id).invoke_async(&mut conn).await?;
                    Ok(attempts)
                })
            })
            .await
            .map_err(InfrastructureError::from)?;

        if attempts < 0 {
            return Ok(None);
        }
        i32::try_from(attempts)
            .map(Some)
            .map_err(|e| DomainError::internal(format!("Invalid attempts: {}", e)))
    }

    async fn consume_request(&self, request: &VerificationRequest) -> Result<bool, DomainError> {
        let key = keys::request_key(self.prefix(), &request.phone, request.purpose);
        let id = request.id.to_string();

        let deleted = self
            .client
            .execute_with_retry(|mut conn| {
                let script = self.consume.clone();
                let key = key.clone();
                let id = id.clone();
                Box::pin(async move {
                    let deleted: i64 = script.key(key).arg(id).invoke_async(&mut conn).await?;
                    Ok(deleted)
                })
            })
            .await
            .map_err(InfrastructureError::from)?;

        Ok(deleted > 0)
    }

    async fn count_issued_since(
        &self,
        phone: &str,
        since: DateTime<Utc>,
    ) -> Result<u32, DomainError> {
        let key = keys::issuance_key(self.prefix(), phone);
        let since_ms = since.timestamp_millis();

        let issued = self
            .client
            .execute_with_retry(|mut conn| {
                let key = key.clone();
                Box::pin(async move {
                    redis::cmd("ZCOUNT")
                        .arg(key)
                        .arg(since_ms)
                        .arg("+inf")
                        .query_async::<_, u64>(&mut conn)
                        .await
                })
            })
            .await
            .map_err(InfrastructureError::from)?;

        Ok(u32::try_from(issued).unwrap_or(u32::MAX))
    }

    async fn last_issued_at(
        &self,
        phone: &str,
        purpose: Purpose,
    ) -> Result<Option<DateTime<Utc>>, DomainError> {
        let key = keys::issuance_key(self.prefix(), phone);

        let entries = self
            .client
            .execute_with_retry(|mut conn| {
                let key = key.clone();
                Box::pin(async move {
                    redis::cmd("ZRANGE")
                        .arg(key)
                        .arg(0)
                        .arg(-1)
                        .arg("WITHSCORES")
                        .query_async::<_, Vec<(String, f64)>>(&mut conn)
                        .await
                })
            })
            .await
            .map_err(InfrastructureError::from)?;

        entries
            .iter()
            .filter(|(member, _)| keys::member_purpose(member) == Some(purpose))
            .map(|(_, score)| *score as i64)
            .max()
            .map(Self::millis_to_datetime)
            .transpose()
    }

    async fn save_token(&self, token: &VerifiedToken) -> Result<(), DomainError> {
        let key = keys::token_key(self.prefix(), &token.token);
        let value = serde_json::to_string(token)
            .map_err(|e| DomainError::internal(format!("Failed to encode token: {}", e)))?;
        let ttl = (token.expires_at - Utc::now()).num_seconds().max(0) as u64 + 1;

        self.client.set_with_expiry(&key, &value, ttl).await?;
        Ok(())
    }

    async fn find_token(&self, token: &str) -> Result<Option<VerifiedToken>, DomainError> {
        let key = keys::token_key(self.prefix(), token);

        self.client
            .get(&key)
            .await?
            .map(|value| {
                serde_json::from_str(&value)
                    .map_err(|e| DomainError::internal(format!("Failed to decode token: {}", e)))
            })
            .transpose()
    }

    async fn delete_token(&self, token: &str) -> Result<bool, DomainError> {
        let key = keys::token_key(self.prefix(), token);
        Ok(self.client.delete(&key).await?)
    }

    async fn purge_expired(
        &self,
        now: DateTime<Utc>,
        issuance_cutoff: DateTime<Utc>,
    ) -> Result<PurgeStats, DomainError> {
        let mut stats = PurgeStats::default();
        let now_ms = now.timestamp_millis();
        let cutoff = format!("({}", issuance_cutoff.timestamp_millis());

        for key in self.scan_keys(&keys::request_pattern(self.prefix())).await? {
            let deleted = self
                .client
                .execute_with_retry(|mut conn| {
                    let script = self.purge_request.clone();
                    let key = key.clone();
                    Box::pin(async move {
                        let deleted: i64 = script.key(key).arg(now_ms).invoke_async(&mut conn).await?;
                        Ok(deleted)
                    })
                })
                .await
                .map_err(InfrastructureError::from)?;
            stats.requests += deleted.max(0) as u64;
        }

        for key in self.scan_keys(&keys::issuance_pattern(self.prefix())).await? {
            let removed = self
                .client
                .execute_with_retry(|mut conn| {
                    let key = key.clone();
                    let cutoff = cutoff.clone();
                    Box::pin(async move {
                        redis::cmd("ZREMRANGEBYSCORE")
                            .arg(key)
                            .arg("-inf")
                            .arg(cutoff)
                            .query_async::<_, u64>(&mut conn)
                            .await
                    })
                })
                .await
                .map_err(InfrastructureError::from)?;
            stats.issuances += removed;
        }

        Ok(stats)
    }

    async fn health_check(&self) -> Result<(), DomainError> {
        if self.client.health_check().await? {
            Ok(())
        } else {
            Err(DomainError::internal("Redis did not answer PING"))
        }
    }
}
