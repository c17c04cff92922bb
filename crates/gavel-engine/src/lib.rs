//! # gavel-engine
//!
//! **Settlement engine** for a single-asset English auction: accepts
//! strictly increasing bids, keeps a pull-based ledger of outbid funds,
//! and pays the winning bid to the beneficiary exactly once.
//!
//! ## Architecture
//!
//! - [`Auction`]: the state machine (`bid`, `reclaim`, `close`, queries)
//! - [`ValueTransfer`]: the external payout seam, allowed to re-enter the engine
//! - [`ValueConservation`]: deposits vs. withdrawals invariant
//! - [`SettlementJournal`]: bounded hash-chained receipts
//!
//! ## Checks-Effects-Interactions
//!
//! ```text
//! validate ──▶ commit ledger effects ──▶ external transfer ──▶ ok
//!                                              │
//!                                              └─ failure ──▶ re-apply pre-image
//! ```
//!
//! Any nested call made from inside a transfer sees a ledger that already
//! reflects "nothing more is owed here".

pub mod auction;
pub mod conservation;
pub mod journal;
pub mod transfer;

pub use auction::Auction;
pub use conservation::ValueConservation;
pub use journal::SettlementJournal;
pub use transfer::{TransferError, TransferLedger, ValueTransfer};
