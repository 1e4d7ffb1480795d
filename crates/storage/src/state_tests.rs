// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use ts_core::NewTrade;

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
}

fn record(trade_id: &str, version: u32, maturity_day: u32) -> TradeRecord {
    NewTrade::new(trade_id, version, "CP-1", "B1", date(maturity_day)).accept(date(1))
}

fn save(state: &mut PrimaryState, record: TradeRecord) {
    state.apply(&PrimaryOp::Save { record });
}

#[test]
fn apply_save_creates_version() {
    let mut state = PrimaryState::default();
    save(&mut state, record("T1", 1, 20));

    assert_eq!(state.len(), 1);
    assert_eq!(state.get("T1", 1).map(|r| r.version), Some(1));
    assert!(state.get("T1", 2).is_none());
}

#[test]
fn latest_is_highest_version() {
    let mut state = PrimaryState::default();
    save(&mut state, record("T1", 2, 20));
    save(&mut state, record("T1", 1, 20));
    save(&mut state, record("T1", 5, 20));

    assert_eq!(state.latest("T1").map(|r| r.version), Some(5));
    assert!(state.latest("T2").is_none());
}

#[test]
fn versions_are_newest_first() {
    let mut state = PrimaryState::default();
    for v in [3, 1, 2] {
        save(&mut state, record("T1", v, 20));
    }

    let versions: Vec<u32> = state.versions("T1").iter().map(|r| r.version).collect();
    assert_eq!(versions, vec![3, 2, 1]);
}

#[test]
fn all_groups_by_trade_id() {
    let mut state = PrimaryState::default();
    save(&mut state, record("T2", 1, 20));
    save(&mut state, record("T1", 1, 20));
    save(&mut state, record("T1", 2, 20));

    let keys: Vec<String> = state.all().iter().map(|r| r.key().to_string()).collect();
    assert_eq!(keys, vec!["T1:v2", "T1:v1", "T2:v1"]);
}

#[test]
fn expiry_candidates_skip_expired_and_future() {
    let mut state = PrimaryState::default();
    save(&mut state, record("T1", 1, 10));
    save(&mut state, record("T2", 1, 10).into_expired());
    save(&mut state, record("T3", 1, 15));
    save(&mut state, record("T4", 1, 20));

    let due: Vec<String> = state
        .expiry_candidates(date(15))
        .iter()
        .map(|r| r.trade_id.clone())
        .collect();
    assert_eq!(due, vec!["T1"]);
}

#[test]
fn check_insert_rejects_existing_and_older_versions() {
    let mut state = PrimaryState::default();
    save(&mut state, record("T1", 2, 20));

    assert!(matches!(
        state.check_insert(&record("T1", 2, 20)),
        Err(StoreError::VersionExists(_))
    ));
    assert!(matches!(
        state.check_insert(&record("T1", 1, 20)),
        Err(StoreError::StaleVersion { latest: 2, .. })
    ));
    assert!(state.check_insert(&record("T1", 3, 20)).is_ok());
    assert!(state.check_insert(&record("T9", 1, 20)).is_ok());
}

#[test]
fn check_save_requires_existing_identity() {
    let state = PrimaryState::default();
    assert!(matches!(
        state.check_save(&record("T1", 1, 20)),
        Err(StoreError::NotFound(_))
    ));
}

#[test]
fn check_save_refuses_rewrites_of_expired() {
    let mut state = PrimaryState::default();
    save(&mut state, record("T1", 1, 20).into_expired());

    assert!(matches!(
        state.check_save(&record("T1", 1, 20)),
        Err(StoreError::ExpiredReversal(_))
    ));
    assert!(matches!(
        state.check_save(&record("T1", 1, 20).into_expired()),
        Err(StoreError::AlreadyExpired(_))
    ));
}

#[test]
fn check_save_allows_first_expiry() {
    let mut state = PrimaryState::default();
    save(&mut state, record("T1", 1, 20));
    assert!(state.check_save(&record("T1", 1, 20).into_expired()).is_ok());
}

#[test]
fn secondary_assigns_row_ids_in_order() {
    let mut state = SecondaryState::default();
    let first = TradeKey::new("T1", 1);
    assert_eq!(state.row_id_for(&first), 1);

    state.apply(&SecondaryOp::Upsert {
        row: SecondaryRecord::from_trade(1, &record("T1", 1, 20)),
    });
    assert_eq!(state.row_id_for(&first), 1);
    assert_eq!(state.row_id_for(&TradeKey::new("T1", 2)), 2);
}

#[test]
fn secondary_upsert_replaces_row() {
    let mut state = SecondaryState::default();
    let original = record("T1", 1, 20);
    state.apply(&SecondaryOp::Upsert {
        row: SecondaryRecord::from_trade(1, &original),
    });
    state.apply(&SecondaryOp::Upsert {
        row: SecondaryRecord::from_trade(1, &original.clone().into_expired()),
    });

    assert_eq!(state.len(), 1);
    assert!(state.get(&original.key()).map(|r| r.expired).unwrap_or(false));
}
