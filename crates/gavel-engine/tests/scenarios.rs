//! End-to-end auction scenarios.
//!
//! Each test drives a full auction through the public API and checks the
//! ledger, the transferred amounts, and value conservation at every
//! quiescent point.

mod common;

use common::{account, dec, init_tracing};
use gavel_engine::{Auction, TransferLedger};
use gavel_types::{AuctionError, AuctionPhase, ErrorKind, ReceiptKind};
use rust_decimal::Decimal;

// =============================================================================
// Scenario A: outbid, reclaim, close, reclaim again
// =============================================================================
#[test]
fn scenario_a_full_lifecycle() {
    init_tracing();
    let x = account(0xA0);
    let a = account(1);
    let b = account(2);
    let mut auction = Auction::new(x);
    let mut ledger = TransferLedger::new();

    auction.bid(a, dec(100)).unwrap();
    assert_eq!(auction.highest_bid(), dec(100));
    assert_eq!(auction.highest_bidder(), Some(a));
    auction.verify_conservation().unwrap();

    auction.bid(b, dec(200)).unwrap();
    assert_eq!(auction.highest_bid(), dec(200));
    assert_eq!(auction.highest_bidder(), Some(b));
    assert_eq!(auction.reclaimable_of(a), dec(100));
    auction.verify_conservation().unwrap();

    assert_eq!(auction.reclaim(a, &mut ledger).unwrap(), dec(100));
    assert_eq!(ledger.balance(a), dec(100));
    assert_eq!(auction.reclaimable_of(a), Decimal::ZERO);
    auction.verify_conservation().unwrap();

    assert_eq!(auction.close(x, &mut ledger).unwrap(), dec(200));
    assert_eq!(ledger.balance(x), dec(200));
    assert!(auction.is_closed());
    auction.verify_conservation().unwrap();

    assert_eq!(auction.reclaim(a, &mut ledger).unwrap(), Decimal::ZERO);
    assert_eq!(ledger.balance(a), dec(100));

    // Everything deposited has left the engine.
    assert_eq!(auction.held_value(), Decimal::ZERO);
    assert_eq!(ledger.total_transferred(), dec(300));
    assert_eq!(auction.conservation().expected_held(), Decimal::ZERO);
    let last = auction.journal().last().unwrap();
    // The no-op reclaim leaves no receipt behind.
    assert_eq!(last.kind, ReceiptKind::Closed);
    assert_eq!(last.amount, dec(200));
    assert_eq!(last.account, x);
    auction.journal().verify_chain().unwrap();
}

// =============================================================================
// Scenario B: a lower second bid fails and leaves state untouched
// =============================================================================
#[test]
fn scenario_b_lower_bid_rejected() {
    init_tracing();
    let a = account(1);
    let mut auction = Auction::new(account(0xA0));

    auction.bid(a, dec(50)).unwrap();
    let err = auction.bid(a, dec(40)).unwrap_err();
    assert!(matches!(err, AuctionError::BidTooLow { .. }));
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.is_retryable());

    assert_eq!(auction.highest_bid(), dec(50));
    assert_eq!(auction.highest_bidder(), Some(a));
    assert_eq!(auction.reclaimable_of(a), Decimal::ZERO);
    assert_eq!(auction.conservation().deposit_count(), 1);
    assert_eq!(auction.conservation().expected_held(), dec(50));
    auction.verify_conservation().unwrap();
}

// =============================================================================
// Scenario C: only the beneficiary may close
// =============================================================================
#[test]
fn scenario_c_non_beneficiary_close() {
    init_tracing();
    let x = account(0xA0);
    let mut auction = Auction::new(x);
    let mut ledger = TransferLedger::new();
    auction.bid(account(1), dec(75)).unwrap();

    let err = auction.close(account(1), &mut ledger).unwrap_err();
    assert!(matches!(err, AuctionError::Unauthorized { caller, beneficiary }
        if caller == account(1) && beneficiary == x));
    assert_eq!(err.kind(), ErrorKind::Authorization);

    assert!(!auction.is_closed());
    assert_eq!(auction.highest_bid(), dec(75));
    assert_eq!(ledger.total_transferred(), Decimal::ZERO);
}

// =============================================================================
// Close is one-shot
// =============================================================================
#[test]
fn second_close_is_state_error_without_payout() {
    init_tracing();
    let x = account(0xA0);
    let mut auction = Auction::new(x);
    let mut ledger = TransferLedger::new();
    auction.bid(account(1), dec(500)).unwrap();

    auction.close(x, &mut ledger).unwrap();
    let err = auction.close(x, &mut ledger).unwrap_err();
    assert!(matches!(err, AuctionError::AlreadyClosed));
    assert_eq!(err.kind(), ErrorKind::State);
    assert_eq!(ledger.balance(x), dec(500));

    let closes = auction
        .journal()
        .receipts()
        .filter(|r| r.kind == ReceiptKind::Closed)
        .count();
    assert_eq!(closes, 1);
}

#[test]
fn bid_after_close_is_state_error() {
    init_tracing();
    let x = account(0xA0);
    let mut auction = Auction::new(x);
    let mut ledger = TransferLedger::new();
    auction.bid(account(1), dec(5)).unwrap();
    auction.close(x, &mut ledger).unwrap();

    let err = auction.bid(account(2), dec(6)).unwrap_err();
    assert!(matches!(err, AuctionError::AuctionClosed));
    assert_eq!(err.kind(), ErrorKind::State);
    assert_eq!(auction.phase(), AuctionPhase::Closed);
    assert_eq!(auction.highest_bidder(), Some(account(1)));
}

// =============================================================================
// Multi-bidder accounting
// =============================================================================
#[test]
fn many_bidders_reclaim_exactly_their_superseded_bids() {
    init_tracing();
    let x = account(0xA0);
    let mut auction = Auction::new(x);
    let mut ledger = TransferLedger::new();

    // (bidder, amount) in order; every bid tops the last.
    let bids = [(1u8, 10i64), (2, 20), (3, 30), (1, 40), (2, 50), (1, 60), (3, 70)];
    for (who, amount) in bids {
        auction.bid(account(who), dec(amount)).unwrap();
        auction.verify_conservation().unwrap();
    }

    // Leader is 3 @ 70; superseded: 1 -> 10+40+60, 2 -> 20+50, 3 -> 30.
    assert_eq!(auction.highest_bidder(), Some(account(3)));
    assert_eq!(auction.reclaimable_of(account(1)), dec(110));
    assert_eq!(auction.reclaimable_of(account(2)), dec(70));
    assert_eq!(auction.reclaimable_of(account(3)), dec(30));
    assert_eq!(auction.total_reclaimable(), dec(210));
    assert_eq!(auction.held_value(), dec(280));

    auction.close(x, &mut ledger).unwrap();
    for who in [1u8, 2, 3] {
        auction.reclaim(account(who), &mut ledger).unwrap();
        auction.verify_conservation().unwrap();
    }

    assert_eq!(ledger.balance(account(1)), dec(110));
    assert_eq!(ledger.balance(account(2)), dec(70));
    assert_eq!(ledger.balance(account(3)), dec(30));
    assert_eq!(ledger.balance(x), dec(70));
    assert_eq!(auction.held_value(), Decimal::ZERO);
    assert_eq!(ledger.total_transferred(), dec(280));
}

#[test]
fn fractional_amounts_are_exact() {
    init_tracing();
    let x = account(0xA0);
    let mut auction = Auction::new(x);
    let mut ledger = TransferLedger::new();

    auction.bid(account(1), Decimal::new(1, 8)).unwrap(); // 0.00000001
    auction.bid(account(2), Decimal::new(2, 8)).unwrap();
    auction.bid(account(1), Decimal::new(100_000_001, 8)).unwrap(); // 1.00000001

    assert_eq!(auction.reclaimable_of(account(1)), Decimal::new(1, 8));
    assert_eq!(auction.reclaimable_of(account(2)), Decimal::new(2, 8));
    auction.close(x, &mut ledger).unwrap();
    assert_eq!(ledger.balance(x), Decimal::new(100_000_001, 8));
    auction.verify_conservation().unwrap();
}

#[test]
fn transfer_failure_rolls_back_and_is_reported() {
    init_tracing();
    let x = account(0xA0);
    let a = account(1);
    let mut auction = Auction::new(x);
    let mut ledger = TransferLedger::new();
    auction.bid(a, dec(10)).unwrap();
    auction.bid(account(2), dec(20)).unwrap();

    ledger.set_rejecting(a, true);
    let err = auction.reclaim(a, &mut ledger).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transfer);
    assert!(format!("{err}").starts_with("AU_ERR_400"));
    assert_eq!(auction.reclaimable_of(a), dec(10));
    auction.verify_conservation().unwrap();

    // The payout path is unaffected by the stuck reclaim.
    auction.close(x, &mut ledger).unwrap();
    assert_eq!(ledger.balance(x), dec(20));
    assert_eq!(auction.reclaimable_of(a), dec(10));
    auction.verify_conservation().unwrap();
}
