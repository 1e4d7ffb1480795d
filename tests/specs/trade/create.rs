//! Trade creation specs
//!
//! Verify validation, conflict detection, and the stored shape of new trades.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[tokio::test]
async fn valid_trade_becomes_latest_version() {
    let store = Store::empty();

    let stored = store
        .service
        .create_record(store.trade("T1", 1, store.tomorrow()))
        .await
        .unwrap();

    let latest = store.latest("T1").await.unwrap();
    assert_eq!(latest, stored);
    assert_eq!(latest.version, 1);
    assert_eq!(latest.created_date, store.today());
    assert!(!latest.expired);
    assert_eq!(store.events().await, vec![("created".to_string(), "T1".to_string())]);
}

#[tokio::test]
async fn duplicate_version_is_a_conflict() {
    let store = Store::empty();
    let trade = store.trade("T1", 1, store.tomorrow());

    store.service.create_record(trade.clone()).await.unwrap();
    let err = store.service.create_record(trade).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(store.versions("T1").await, vec![1]);
    assert_eq!(store.events().await.len(), 1);
}

#[tokio::test]
async fn past_maturity_is_a_validation_error() {
    let store = Store::empty();

    let err = store
        .service
        .create_record(store.trade("T1", 1, store.yesterday()))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(store.latest("T1").await.is_none());
    assert!(store.service.list_primary().await.unwrap().is_empty());
    assert!(store.service.list_secondary().await.unwrap().is_empty());
    assert!(store.events().await.is_empty());
}

#[tokio::test]
async fn past_maturity_is_validation_even_for_a_taken_version() {
    let store = Store::empty();
    store
        .service
        .create_record(store.trade("T1", 1, store.tomorrow()))
        .await
        .unwrap();

    let err = store
        .service
        .create_record(store.trade("T1", 1, store.yesterday()))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn maturity_today_is_accepted() {
    let store = Store::empty();
    let trade = store.trade("T1", 1, store.today());

    assert!(store.service.create_record(trade).await.is_ok());
}

#[tokio::test]
async fn blank_counterparty_is_a_validation_error() {
    let store = Store::empty();
    let trade = NewTrade::new("T1", 1, " ", "B1", store.tomorrow());

    let err = store.service.create_record(trade).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.to_string().contains("counter_party_id"));
}

#[tokio::test]
async fn version_zero_is_a_validation_error() {
    let store = Store::empty();

    let err = store
        .service
        .create_record(store.trade("T1", 0, store.tomorrow()))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn secondary_copy_matches_primary() {
    let store = Store::empty();
    store
        .service
        .create_record(store.trade("T1", 1, store.tomorrow()))
        .await
        .unwrap();
    store
        .service
        .create_record(store.trade("T2", 3, store.tomorrow()))
        .await
        .unwrap();

    let mut primary = store.service.list_primary().await.unwrap();
    let mut secondary = store.service.list_secondary().await.unwrap();
    primary.sort_by_key(|r| r.key());
    secondary.sort_by_key(|r| r.key());
    assert_eq!(primary, secondary);
}
