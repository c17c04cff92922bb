//! Auction lifecycle types.
//!
//! An auction is created **OPEN** and moves to **CLOSED** exactly once,
//! irreversibly, when the beneficiary collects the winning bid.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::AccountId;

/// The two lifecycle phases of an auction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuctionPhase {
    /// Accepting bids.
    Open,
    /// Winning bid paid out; no further bids.
    Closed,
}

impl AuctionPhase {
    #[must_use]
    pub fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

impl fmt::Display for AuctionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Closed => write!(f, "CLOSED"),
        }
    }
}

/// The currently winning `(bidder, amount)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadingBid {
    pub bidder: AccountId,
    pub amount: Decimal,
}
