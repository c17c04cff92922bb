//! Hash-chained receipts for the Gavel audit trail.
//!
//! Every committed state change (bid accepted, leader outbid, balance
//! reclaimed, auction closed) produces a [`Receipt`]. Each receipt commits to
//! its predecessor through `prev_hash`, so any edit to a retained receipt
//! breaks the chain.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{AccountId, constants};

/// The type of state change this receipt proves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReceiptKind {
    /// A bid was accepted and became the leading bid.
    BidPlaced,
    /// A previous leader was outbid; its amount became reclaimable.
    Outbid,
    /// An account withdrew its reclaimable balance.
    Reclaimed,
    /// The auction closed and the winning bid was paid to the beneficiary.
    Closed,
}

impl ReceiptKind {
    /// Stable one-byte tag fed into the receipt hash.
    #[must_use]
    pub fn tag(self) -> u8 {
        match self {
            Self::BidPlaced => 1,
            Self::Outbid => 2,
            Self::Reclaimed => 3,
            Self::Closed => 4,
        }
    }
}

impl std::fmt::Display for ReceiptKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BidPlaced => write!(f, "BID_PLACED"),
            Self::Outbid => write!(f, "OUTBID"),
            Self::Reclaimed => write!(f, "RECLAIMED"),
            Self::Closed => write!(f, "CLOSED"),
        }
    }
}

/// A single audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Position in the journal, starting at zero.
    pub sequence: u64,
    pub kind: ReceiptKind,
    /// The account the state change concerns.
    pub account: AccountId,
    pub amount: Decimal,
    /// Hash of the previous receipt ([`constants::GENESIS_HASH`] for the first).
    pub prev_hash: [u8; 32],
    /// SHA-256 over the fields above. `recorded_at` is not hashed.
    pub hash: [u8; 32],
    pub recorded_at: DateTime<Utc>,
}

impl Receipt {
    /// Build a receipt and seal it with its hash.
    #[must_use]
    pub fn new(
        sequence: u64,
        kind: ReceiptKind,
        account: AccountId,
        amount: Decimal,
        prev_hash: [u8; 32],
    ) -> Self {
        let hash = Self::compute_hash(sequence, kind, account, amount, &prev_hash);
        Self {
            sequence,
            kind,
            account,
            amount,
            prev_hash,
            hash,
            recorded_at: Utc::now(),
        }
    }

    /// `SHA-256(domain || seq || kind || account || amount || prev_hash)`
    #[must_use]
    pub fn compute_hash(
        sequence: u64,
        kind: ReceiptKind,
        account: AccountId,
        amount: Decimal,
        prev_hash: &[u8; 32],
    ) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(constants::RECEIPT_DOMAIN);
        hasher.update(sequence.to_be_bytes());
        hasher.update([kind.tag()]);
        hasher.update(account.as_bytes());
        hasher.update(amount.serialize());
        hasher.update(prev_hash);
        hasher.finalize().into()
    }

    /// Recompute the hash and compare it with the stored one.
    #[must_use]
    pub fn is_intact(&self) -> bool {
        Self::compute_hash(
            self.sequence,
            self.kind,
            self.account,
            self.amount,
            &self.prev_hash,
        ) == self.hash
    }

    /// Hex form of the hash, for logs.
    #[must_use]
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }
}
