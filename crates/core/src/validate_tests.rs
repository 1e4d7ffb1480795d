// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

fn trade(version: u32, days_from_today: i64) -> NewTrade {
    NewTrade::new(
        "T1",
        version,
        "CP-1",
        "B1",
        today() + chrono::Duration::days(days_from_today),
    )
}

#[test]
fn accepts_first_version_maturing_tomorrow() {
    assert_eq!(validate(&trade(1, 1), &[], today()), Ok(()));
}

#[test]
fn accepts_maturity_today() {
    assert_eq!(validate(&trade(1, 0), &[], today()), Ok(()));
}

#[test]
fn rejects_past_maturity() {
    let err = validate(&trade(1, -1), &[], today()).unwrap_err();
    assert!(matches!(err, Rejection::PastMaturityDate { .. }));
    assert_eq!(err.class(), RejectionClass::Validation);
}

#[test]
fn past_maturity_wins_over_duplicate() {
    let err = validate(&trade(1, -1), &[1], today()).unwrap_err();
    assert_eq!(err.class(), RejectionClass::Validation);
}

#[test]
fn rejects_duplicate_version() {
    let err = validate(&trade(2, 5), &[1, 2], today()).unwrap_err();
    assert_eq!(
        err,
        Rejection::DuplicateVersion {
            trade_id: "T1".to_string(),
            version: 2,
        }
    );
    assert_eq!(err.class(), RejectionClass::Conflict);
}

#[test]
fn rejects_version_below_latest() {
    let err = validate(&trade(2, 5), &[1, 3], today()).unwrap_err();
    assert_eq!(
        err,
        Rejection::NonMonotonicVersion {
            trade_id: "T1".to_string(),
            version: 2,
            latest: 3,
        }
    );
    assert_eq!(err.class(), RejectionClass::Conflict);
}

#[test]
fn version_gaps_are_allowed() {
    assert_eq!(validate(&trade(7, 5), &[1, 2], today()), Ok(()));
}

#[test]
fn rejects_zero_version() {
    let err = validate(&trade(0, 5), &[], today()).unwrap_err();
    assert_eq!(err, Rejection::InvalidVersion(0));
}

#[parameterized(
    blank_trade_id = { "", "CP-1", "B1", "trade_id" },
    blank_counter_party = { "T1", "  ", "B1", "counter_party_id" },
    blank_book = { "T1", "CP-1", "", "book_id" },
)]
fn rejects_missing_fields(trade_id: &str, cp: &str, book: &str, field: &str) {
    let candidate = NewTrade::new(trade_id, 1, cp, book, today());
    let err = validate(&candidate, &[], today()).unwrap_err();
    assert_eq!(err, Rejection::MissingField(field));
    assert_eq!(err.class(), RejectionClass::Validation);
}

#[parameterized(
    no_history = { &[], 1, true },
    next_version = { &[1], 2, true },
    skips_ahead = { &[1, 2], 10, true },
    duplicate_latest = { &[1, 2], 2, false },
    duplicate_older = { &[1, 2], 1, false },
    below_latest = { &[1, 5], 3, false },
)]
fn identity_rules(existing: &[u32], version: u32, accepted: bool) {
    assert_eq!(
        validate_identity(&trade(version, 1), existing).is_ok(),
        accepted
    );
}

#[test]
fn validation_is_repeatable() {
    let candidate = trade(3, 2);
    let existing = [1, 2];
    let first = validate(&candidate, &existing, today());
    let second = validate(&candidate, &existing, today());
    assert_eq!(first, second);
}

// Property-based tests
use proptest::prelude::*;

proptest! {
    #[test]
    fn accepted_iff_strictly_greater_than_all(
        existing in proptest::collection::vec(1u32..50, 0..10),
        version in 1u32..60,
    ) {
        let accepted = validate(&trade(version, 1), &existing, today()).is_ok();
        let expected = existing.iter().all(|v| *v < version);
        prop_assert_eq!(accepted, expected);
    }

    #[test]
    fn past_maturity_always_rejected(
        existing in proptest::collection::vec(1u32..50, 0..10),
        version in 0u32..60,
        days_ago in 1i64..400,
    ) {
        let result = validate(&trade(version, -days_ago), &existing, today());
        prop_assert!(result.is_err());
        prop_assert_eq!(result.unwrap_err().class(), RejectionClass::Validation);
    }
}
