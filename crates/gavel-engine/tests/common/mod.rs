//! Shared helpers for the engine integration tests.

#![allow(dead_code)]

use std::sync::Once;

use gavel_types::AccountId;
use rust_decimal::Decimal;

static INIT: Once = Once::new();

/// Install a test-friendly tracing subscriber once per test binary.
///
/// Honors `RUST_LOG`; silent by default.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn dec(n: i64) -> Decimal {
    Decimal::new(n, 0)
}

pub fn account(n: u8) -> AccountId {
    AccountId::from_bytes([n; 16])
}
