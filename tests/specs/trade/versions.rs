//! Version history specs
//!
//! Verify ordering rules and history listings across versions of a trade.

use crate::prelude::*;

#[tokio::test]
async fn versions_list_newest_first() {
    let store = Store::empty();
    for v in [1, 2, 5, 9] {
        store
            .service
            .create_record(store.trade("T1", v, store.tomorrow()))
            .await
            .unwrap();
    }

    assert_eq!(store.versions("T1").await, vec![9, 5, 2, 1]);
    assert_eq!(store.latest("T1").await.map(|r| r.version), Some(9));
}

#[tokio::test]
async fn older_version_after_newer_is_a_conflict() {
    let store = Store::empty();
    store
        .service
        .create_record(store.trade("T1", 4, store.tomorrow()))
        .await
        .unwrap();

    let err = store
        .service
        .create_record(store.trade("T1", 3, store.tomorrow()))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(store.versions("T1").await, vec![4]);
}

#[tokio::test]
async fn interleaved_trades_keep_independent_histories() {
    let store = Store::empty();
    let submissions = [("A", 1), ("B", 1), ("A", 2), ("C", 7), ("B", 3), ("A", 3)];
    for (trade_id, version) in submissions {
        store
            .service
            .create_record(store.trade(trade_id, version, store.tomorrow()))
            .await
            .unwrap();
    }

    assert_eq!(store.versions("A").await, vec![3, 2, 1]);
    assert_eq!(store.versions("B").await, vec![3, 1]);
    assert_eq!(store.versions("C").await, vec![7]);
    assert!(store.versions("D").await.is_empty());
    assert_eq!(store.service.list_primary().await.unwrap().len(), 6);
}

#[tokio::test]
async fn exact_lookup_finds_each_version() {
    let store = Store::empty();
    for v in 1..=3 {
        store
            .service
            .create_record(store.trade("T1", v, store.tomorrow()))
            .await
            .unwrap();
    }

    let v2 = store.service.get_exact("T1", 2).await.unwrap().unwrap();
    assert_eq!(v2.version, 2);
    assert!(store.service.get_exact("T1", 4).await.unwrap().is_none());
}
