// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! WAL-backed primary and secondary trade stores

mod error;
mod operation;
mod primary;
mod secondary;
mod state;
mod wal;

pub use error::StoreError;
pub use operation::{PrimaryOp, SecondaryOp};
pub use primary::{PrimaryStore, WalPrimaryStore};
pub use secondary::{SecondaryRecord, SecondaryStore, WalSecondaryStore};
pub use state::{PrimaryState, SecondaryState};
pub use wal::{Wal, WalError};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakePrimaryStore, FakeSecondaryStore, PrimaryCall};
