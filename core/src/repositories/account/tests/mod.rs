use crate::domain::entities::{AccountProvider, AccountSummary};
use crate::repositories::account::{AccountDirectory, InMemoryAccountDirectory};

#[tokio::test]
async fn test_find_by_phone() {
    let directory = InMemoryAccountDirectory::new();
    directory
        .insert(AccountSummary::new("01012345678", AccountProvider::Kakao))
        .await;

    let found = directory.find_by_phone("01012345678").await.unwrap().unwrap();
    assert!(found.is_kakao());
    assert!(directory.find_by_phone("01099999999").await.unwrap().is_none());
}
