//! Unit tests for the verification reaper

use chrono::{Duration as ChronoDuration, Utc};
use std::sync::Arc;
use std::time::Duration;

use crate::domain::entities::{Purpose, VerifiedToken};
use crate::repositories::{InMemoryVerificationStore, VerificationStore};
use crate::services::verification::{VerificationReaper, VerificationService, VerificationServiceConfig};

use super::mocks::{aged_request, FailingStore};

const PHONE: &str = "01012345678";

fn reaper(store: Arc<InMemoryVerificationStore>, interval: Duration) -> Arc<VerificationReaper<InMemoryVerificationStore>> {
    let service = Arc::new(VerificationService::new(store, VerificationServiceConfig::default()));
    Arc::new(VerificationReaper::new(service, interval))
}

async fn seed_expired(store: &InMemoryVerificationStore) {
    store
        .save_request(&aged_request(PHONE, Purpose::Signup, "123456", ChronoDuration::minutes(10)))
        .await
        .unwrap();
    let mut token = VerifiedToken::new(PHONE.to_string(), Purpose::Reset, ChronoDuration::minutes(10));
    token.expires_at = Utc::now() - ChronoDuration::minutes(1);
    store.save_token(&token).await.unwrap();
}

#[tokio::test]
async fn test_run_once() {
    let store = Arc::new(InMemoryVerificationStore::new());
    seed_expired(&store).await;
    store
        .save_request(&aged_request(PHONE, Purpose::Reset, "654321", ChronoDuration::hours(30)))
        .await
        .unwrap();
    store
        .save_request(&aged_request("01087654321", Purpose::Signup, "111111", ChronoDuration::seconds(5)))
        .await
        .unwrap();

    let stats = reaper(store.clone(), Duration::from_secs(60)).run_once().await.unwrap();

    assert_eq!(stats.requests, 2);
    assert_eq!(stats.tokens, 1);
    // Only the 30 hour old issuance falls outside the daily window
    assert_eq!(stats.issuances, 1);
    assert_eq!(store.request_count().await, 1);
    assert_eq!(store.issuance_count().await, 2);
}

#[tokio::test(start_paused = true)]
async fn test_background_sweeps_until_stopped() {
    let store = Arc::new(InMemoryVerificationStore::new());
    seed_expired(&store).await;

    let handle = reaper(store.clone(), Duration::from_secs(60)).start();
    assert!(handle.is_running());

    // First sweep runs immediately
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(store.request_count().await, 0);
    assert_eq!(store.token_count().await, 0);

    // And again on the next tick
    seed_expired(&store).await;
    tokio::time::sleep(Duration::from_secs(61)).await;
    assert_eq!(store.request_count().await, 0);

    handle.stop().await;

    seed_expired(&store).await;
    tokio::time::sleep(Duration::from_secs(300)).await;
    assert_eq!(store.request_count().await, 1);
    assert_eq!(store.token_count().await, 1);
}

#[tokio::test(start_paused = true)]
async fn test_sweep_failures_do_not_stop_the_loop() {
    let service = Arc::new(VerificationService::new(
        Arc::new(FailingStore),
        VerificationServiceConfig::default(),
    ));
    let reaper = Arc::new(VerificationReaper::new(service, Duration::from_secs(1)));

    assert!(reaper.run_once().await.is_err());

    let handle = reaper.start();
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(handle.is_running());
    handle.stop().await;
}
