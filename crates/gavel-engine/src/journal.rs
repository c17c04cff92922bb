//! Bounded, hash-chained audit journal.
//!
//! Keeps the most recent `capacity` receipts. Eviction drops the oldest
//! receipt but never the chain head, so new receipts always link to the
//! true predecessor and [`SettlementJournal::verify_chain`] can still check
//! every retained link.

use std::collections::VecDeque;

use gavel_types::{AccountId, AuctionError, Receipt, ReceiptKind, Result, constants};
use rust_decimal::Decimal;

/// Append-only receipt log with LRU-style eviction.
#[derive(Debug, Clone)]
pub struct SettlementJournal {
    /// Retained receipts (front = oldest).
    receipts: VecDeque<Receipt>,
    /// Hash of the most recently appended receipt.
    head: [u8; 32],
    /// Sequence number for the next receipt.
    next_sequence: u64,
    /// Maximum number of receipts before eviction kicks in.
    capacity: usize,
}

impl SettlementJournal {
    /// Create an empty journal.
    ///
    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "SettlementJournal capacity must be > 0");
        Self {
            receipts: VecDeque::with_capacity(capacity.min(1024)),
            head: constants::GENESIS_HASH,
            next_sequence: 0,
            capacity,
        }
    }

    /// Append a receipt linked to the current head and return a reference to it.
    pub fn append(&mut self, kind: ReceiptKind, account: AccountId, amount: Decimal) -> &Receipt {
        if self.receipts.len() >= self.capacity {
            self.receipts.pop_front();
        }

        let receipt = Receipt::new(self.next_sequence, kind, account, amount, self.head);
        self.head = receipt.hash;
        self.next_sequence += 1;

        tracing::debug!(
            seq = receipt.sequence,
            kind = %receipt.kind,
            account = %receipt.account.short(),
            amount = %receipt.amount,
            hash = %receipt.hash_hex(),
            "Receipt appended"
        );

        self.receipts.push_back(receipt);
        // Just pushed.
        &self.receipts[self.receipts.len() - 1]
    }

    /// Check every retained receipt's hash and its link to the previous one.
    ///
    /// # Errors
    /// Returns [`AuctionError::JournalCorrupted`] naming the first bad sequence.
    pub fn verify_chain(&self) -> Result<()> {
        let mut prev: Option<&Receipt> = None;
        for receipt in &self.receipts {
            let linked = match prev {
                Some(p) => receipt.prev_hash == p.hash && receipt.sequence == p.sequence + 1,
                None => receipt.sequence > 0 || receipt.prev_hash == constants::GENESIS_HASH,
            };
            if !linked || !receipt.is_intact() {
                return Err(AuctionError::JournalCorrupted {
                    sequence: receipt.sequence,
                });
            }
            prev = Some(receipt);
        }
        if let Some(last) = prev {
            if last.hash != self.head {
                return Err(AuctionError::JournalCorrupted {
                    sequence: last.sequence,
                });
            }
        }
        Ok(())
    }

    /// Retained receipts, oldest first.
    pub fn receipts(&self) -> impl Iterator<Item = &Receipt> {
        self.receipts.iter()
    }

    /// Most recent receipt, if any is retained.
    #[must_use]
    pub fn last(&self) -> Option<&Receipt> {
        self.receipts.back()
    }

    /// Hash of the latest receipt ([`constants::GENESIS_HASH`] when empty).
    #[must_use]
    pub fn head(&self) -> [u8; 32] {
        self.head
    }

    /// Total receipts ever appended, including evicted ones.
    #[must_use]
    pub fn total_appended(&self) -> u64 {
        self.next_sequence
    }

    /// Number of receipts currently retained.
    #[must_use]
    pub fn len(&self) -> usize {
        self.receipts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.receipts.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn receipts_mut(&mut self) -> &mut VecDeque<Receipt> {
        &mut self.receipts
    }
}
