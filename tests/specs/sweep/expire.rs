//! Expiration sweep specs
//!
//! Verify that matured trades are flagged expired exactly once.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[tokio::test]
async fn matured_record_is_expired_once() {
    let store = Store::empty();
    let record = store
        .trade("T2", 1, store.yesterday())
        .accept(store.yesterday());
    store.seed(record.clone()).await;
    assert!(!store.latest("T2").await.unwrap().expired);

    let first = store.service.expire_due(store.today()).await.unwrap();
    assert_eq!(
        first,
        SweepReport {
            candidates: 1,
            expired: 1,
            skipped: 0,
            failed: 0
        }
    );
    let expired = store.latest("T2").await.unwrap();
    assert_eq!(expired, record.clone().into_expired());

    let second = store.service.expire_due(store.today()).await.unwrap();
    assert_eq!(second, SweepReport::default());
    assert_eq!(store.latest("T2").await.unwrap(), expired);
    assert_eq!(
        store.events().await,
        vec![("expired".to_string(), "T2".to_string())]
    );
}

#[tokio::test]
async fn unmatured_records_stay_active() {
    let store = Store::empty();
    store
        .service
        .create_record(store.trade("T1", 1, store.today()))
        .await
        .unwrap();
    store
        .service
        .create_record(store.trade("T2", 1, store.tomorrow()))
        .await
        .unwrap();

    let report = store.service.expire_due(store.today()).await.unwrap();

    assert_eq!(report.candidates, 0);
    assert!(!store.latest("T1").await.unwrap().expired);
    assert!(!store.latest("T2").await.unwrap().expired);
}

#[tokio::test]
async fn expiry_reaches_the_secondary_copy_without_duplicates() {
    let store = Store::empty();
    store
        .service
        .create_record(store.trade("T1", 1, store.today()))
        .await
        .unwrap();

    store.service.expire_due(store.tomorrow()).await.unwrap();

    let secondary = store.service.list_secondary().await.unwrap();
    assert_eq!(secondary.len(), 1);
    assert!(secondary[0].expired);
}

#[tokio::test]
async fn every_matured_version_is_swept() {
    let store = Store::empty();
    for v in 1..=3 {
        store
            .service
            .create_record(store.trade("T1", v, store.today()))
            .await
            .unwrap();
    }

    let report = store.service.expire_due(store.tomorrow()).await.unwrap();

    assert_eq!(report.expired, 3);
    assert!(store
        .service
        .list_versions("T1")
        .await
        .unwrap()
        .iter()
        .all(|r| r.expired));
}

#[tokio::test]
async fn concurrent_sweeps_expire_once() {
    let store = Store::empty();
    store
        .seed(
            store
                .trade("T1", 1, store.yesterday())
                .accept(store.yesterday()),
        )
        .await;

    let (a, b) = tokio::join!(
        store.service.expire_due(store.today()),
        store.service.expire_due(store.today())
    );
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_eq!(a.expired + b.expired, 1);
    assert!(a.is_clean() && b.is_clean());
    assert_eq!(
        store.events().await,
        vec![("expired".to_string(), "T1".to_string())]
    );
    let secondary = store.service.list_secondary().await.unwrap();
    assert_eq!(secondary.len(), 1);
    assert!(secondary[0].expired);
}
