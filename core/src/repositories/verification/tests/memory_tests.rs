//! Unit tests for the in-memory verification store

use chrono::{Duration, Utc};

use crate::domain::entities::{Purpose, VerificationRequest, VerifiedToken};
use crate::repositories::verification::{InMemoryVerificationStore, VerificationStore};

const PHONE: &str = "01012345678";

fn request(purpose: Purpose) -> VerificationRequest {
    VerificationRequest::new(PHONE.to_string(), purpose, Duration::minutes(3))
}

#[tokio::test]
async fn test_save_and_find_request() {
    let store = InMemoryVerificationStore::new();
    let request = request(Purpose::Signup);

    store.save_request(&request).await.unwrap();

    let found = store.find_request(PHONE, Purpose::Signup).await.unwrap();
    assert_eq!(found, Some(request));
    assert!(store.find_request(PHONE, Purpose::Reset).await.unwrap().is_none());
}

#[tokio::test]
async fn test_save_supersedes_and_logs_each_issuance() {
    let store = InMemoryVerificationStore::new();
    let first = request(Purpose::Signup);
    let second = request(Purpose::Signup);

    store.save_request(&first).await.unwrap();
    store.save_request(&second).await.unwrap();

    let found = store.find_request(PHONE, Purpose::Signup).await.unwrap().unwrap();
    assert_eq!(found.id, second.id);
    assert_eq!(store.request_count().await, 1);

    let since = Utc::now() - Duration::hours(24);
    assert_eq!(store.count_issued_since(PHONE, since).await.unwrap(), 2);
}

#[tokio::test]
async fn test_count_issued_spans_purposes() {
    let store = InMemoryVerificationStore::new();
    store.save_request(&request(Purpose::Signup)).await.unwrap();
    store.save_request(&request(Purpose::Reset)).await.unwrap();

    let since = Utc::now() - Duration::hours(24);
    assert_eq!(store.count_issued_since(PHONE, since).await.unwrap(), 2);
    assert_eq!(store.count_issued_since("01000000000", since).await.unwrap(), 0);
}

#[tokio::test]
async fn test_last_issued_at_is_per_purpose() {
    let store = InMemoryVerificationStore::new();
    let mut old = request(Purpose::Signup);
    old.created_at = Utc::now() - Duration::minutes(10);
    store.save_request(&old).await.unwrap();
    let reset = request(Purpose::Reset);
    store.save_request(&reset).await.unwrap();

    assert_eq!(
        store.last_issued_at(PHONE, Purpose::Signup).await.unwrap(),
        Some(old.created_at)
    );
    assert_eq!(
        store.last_issued_at(PHONE, Purpose::Reset).await.unwrap(),
        Some(reset.created_at)
    );
}

#[tokio::test]
async fn test_failed_attempt_requires_same_request() {
    let store = InMemoryVerificationStore::new();
    let first = request(Purpose::Signup);
    store.save_request(&first).await.unwrap();

    assert_eq!(store.record_failed_attempt(&first).await.unwrap(), Some(1));
    assert_eq!(store.record_failed_attempt(&first).await.unwrap(), Some(2));

    let second = request(Purpose::Signup);
    store.save_request(&second).await.unwrap();
    assert_eq!(store.record_failed_attempt(&first).await.unwrap(), None);

    let found = store.find_request(PHONE, Purpose::Signup).await.unwrap().unwrap();
    assert_eq!(found.attempts, 0);
}

#[tokio::test]
async fn test_consume_request_only_once() {
    let store = InMemoryVerificationStore::new();
    let request = request(Purpose::Reset);
    store.save_request(&request).await.unwrap();

    assert!(store.consume_request(&request).await.unwrap());
    assert!(!store.consume_request(&request).await.unwrap());
    assert!(store.find_request(PHONE, Purpose::Reset).await.unwrap().is_none());
}

#[tokio::test]
async fn test_consume_ignores_superseded_request() {
    let store = InMemoryVerificationStore::new();
    let stale = request(Purpose::Signup);
    store.save_request(&stale).await.unwrap();
    let fresh = request(Purpose::Signup);
    store.save_request(&fresh).await.unwrap();

    assert!(!store.consume_request(&stale).await.unwrap());
    assert!(store.find_request(PHONE, Purpose::Signup).await.unwrap().is_some());
    assert!(store.consume_request(&fresh).await.unwrap());
    assert!(!store.consume_request(&fresh).await.unwrap());
}

#[tokio::test]
async fn test_token_lifecycle() {
    let store = InMemoryVerificationStore::new();
    let token = VerifiedToken::new(PHONE.to_string(), Purpose::Signup, Duration::minutes(10));

    store.save_token(&token).await.unwrap();
    assert_eq!(store.find_token(&token.token).await.unwrap(), Some(token.clone()));

    assert!(store.delete_token(&token.token).await.unwrap());
    assert!(!store.delete_token(&token.token).await.unwrap());
    assert!(store.find_token(&token.token).await.unwrap().is_none());
}

#[tokio::test]
async fn test_purge_expired() {
    let store = InMemoryVerificationStore::new();
    let now = Utc::now();

    let mut expired = request(Purpose::Signup);
    expired.created_at = now - Duration::hours(25);
    expired.expires_at = now - Duration::hours(24);
    store.save_request(&expired).await.unwrap();
    let live = request(Purpose::Reset);
    store.save_request(&live).await.unwrap();

    let mut stale_token = VerifiedToken::new(PHONE.to_string(), Purpose::Signup, Duration::minutes(10));
    stale_token.expires_at = now - Duration::seconds(1);
    store.save_token(&stale_token).await.unwrap();
    let live_token = VerifiedToken::new(PHONE.to_string(), Purpose::Reset, Duration::minutes(10));
    store.save_token(&live_token).await.unwrap();

    let stats = store
        .purge_expired(now, now - Duration::hours(24))
        .await
        .unwrap();

    assert_eq!(stats.requests, 1);
    assert_eq!(stats.tokens, 1);
    assert_eq!(stats.issuances, 1);
    assert_eq!(stats.total(), 3);
    assert_eq!(store.request_count().await, 1);
    assert_eq!(store.token_count().await, 1);
    assert_eq!(store.issuance_count().await, 1);
}

#[tokio::test]
async fn test_clones_share_state() {
    let store = InMemoryVerificationStore::new();
    let handle = store.clone();
    store.save_request(&request(Purpose::Signup)).await.unwrap();
    assert_eq!(handle.request_count().await, 1);
}
