//! Value conservation invariant checker.
//!
//! Mathematical invariant checked after every operation:
//! ```text
//! held(highest bid if open + Σ reclaimable) == Σ(deposits) - Σ(withdrawals)
//! ```
//!
//! Only the live balance is tracked, so the bound that matters is the value
//! held right now, not the total ever deposited. Deposits that the decimal
//! type cannot add exactly are refused, which keeps every later sum exact.
//!
//! Withdrawals are recorded in the same step that removes the entitlement
//! from the ledger, before the external transfer runs, so the invariant also
//! holds while a payout is in flight.

use gavel_types::{AuctionError, Result};
use rust_decimal::Decimal;

/// Tracks the value one auction should be holding.
#[derive(Debug, Clone, Default)]
pub struct ValueConservation {
    /// Deposits minus withdrawals.
    held: Decimal,
    deposits: u64,
    withdrawals: u64,
}

impl ValueConservation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record value escrowed by an accepted bid.
    ///
    /// # Errors
    /// Returns [`AuctionError::AmountNotRepresentable`] if `held + amount`
    /// overflows or would be rounded; nothing is recorded in that case.
    pub fn record_deposit(&mut self, amount: Decimal) -> Result<()> {
        let held = self.held;
        let next = held
            .checked_add(amount)
            .filter(|next| Self::is_exact_sum(held, amount, *next))
            .ok_or(AuctionError::AmountNotRepresentable { amount, held })?;
        self.held = next;
        self.deposits += 1;
        Ok(())
    }

    /// Record value leaving the engine.
    pub fn record_withdrawal(&mut self, amount: Decimal) {
        self.held -= amount;
        self.withdrawals += 1;
    }

    /// Undo a withdrawal whose transfer failed.
    pub fn revert_withdrawal(&mut self, amount: Decimal) {
        self.held += amount;
        self.withdrawals -= 1;
    }

    /// Value the engine should currently be holding.
    #[must_use]
    pub fn expected_held(&self) -> Decimal {
        self.held
    }

    /// # Errors
    /// Returns [`AuctionError::ConservationViolation`] if `actual_held` differs
    /// from deposits minus withdrawals.
    pub fn verify(&self, actual_held: Decimal) -> Result<()> {
        if actual_held != self.held {
            return Err(AuctionError::ConservationViolation {
                reason: format!(
                    "held {actual_held} != expected {} \
                     (deposits={}, withdrawals={})",
                    self.held, self.deposits, self.withdrawals,
                ),
            });
        }
        Ok(())
    }

    /// Number of deposits recorded.
    #[must_use]
    pub fn deposit_count(&self) -> u64 {
        self.deposits
    }

    /// Number of committed withdrawals.
    #[must_use]
    pub fn withdrawal_count(&self) -> u64 {
        self.withdrawals
    }

    // Addition keeps the larger scale unless the mantissa overflows, in which
    // case it rescales and may round. Undoing the sum both ways catches that.
    fn is_exact_sum(a: Decimal, b: Decimal, sum: Decimal) -> bool {
        if sum.scale() >= a.scale().max(b.scale()) {
            return true;
        }
        sum.checked_sub(b) == Some(a) && sum.checked_sub(a) == Some(b)
    }
}
