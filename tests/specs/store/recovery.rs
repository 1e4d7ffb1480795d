//! Store recovery specs
//!
//! Verify that both stores are rebuilt from their logs after a restart.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[tokio::test]
async fn records_and_expiry_survive_reopen() {
    let mut store = Store::empty();
    store
        .service
        .create_record(store.trade("T1", 1, store.today()))
        .await
        .unwrap();
    store
        .service
        .create_record(store.trade("T1", 2, store.tomorrow()))
        .await
        .unwrap();
    store.service.expire_due(store.tomorrow()).await.unwrap();
    let before = store.service.list_primary().await.unwrap();

    store.reopen().await;

    assert_eq!(store.service.list_primary().await.unwrap(), before);
    assert_eq!(store.service.list_secondary().await.unwrap().len(), 2);
    assert!(store.service.get_exact("T1", 1).await.unwrap().unwrap().expired);
}

#[tokio::test]
async fn version_rules_hold_after_reopen() {
    let mut store = Store::empty();
    store
        .service
        .create_record(store.trade("T1", 2, store.tomorrow()))
        .await
        .unwrap();

    store.reopen().await;

    let err = store
        .service
        .create_record(store.trade("T1", 2, store.tomorrow()))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert!(store
        .service
        .create_record(store.trade("T1", 3, store.tomorrow()))
        .await
        .is_ok());
}
