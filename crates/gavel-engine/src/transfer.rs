//! The value-transfer seam.
//!
//! The engine never moves value itself. Reclaims and the final payout go
//! through a [`ValueTransfer`] implementation supplied by the caller. The
//! implementation receives `&mut Auction` so a recipient may call back into
//! the engine before the transfer returns; this is how reentrancy reaches
//! the engine, as a nested call on the same stack.

use std::collections::{HashMap, HashSet};

use gavel_types::AccountId;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::auction::Auction;

/// Failure reported by a value-transfer primitive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct TransferError {
    pub reason: String,
}

impl TransferError {
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Sends value out of the engine.
///
/// Implementations may re-enter `engine` (bid, reclaim, close, queries)
/// before returning. On `Err`, the engine rolls back the operation that
/// requested the transfer.
pub trait ValueTransfer {
    fn transfer(
        &mut self,
        engine: &mut Auction,
        to: AccountId,
        amount: Decimal,
    ) -> Result<(), TransferError>;
}

/// In-memory transfer primitive crediting per-account balances.
///
/// Accounts can be marked as rejecting payments to exercise the
/// failure path.
#[derive(Debug, Default)]
pub struct TransferLedger {
    /// Value received per account.
    balances: HashMap<AccountId, Decimal>,
    /// Accounts whose incoming transfers fail.
    rejecting: HashSet<AccountId>,
}

impl TransferLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make transfers to `account` fail (or succeed again).
    pub fn set_rejecting(&mut self, account: AccountId, rejecting: bool) {
        if rejecting {
            self.rejecting.insert(account);
        } else {
            self.rejecting.remove(&account);
        }
    }

    /// Value received by `account` so far.
    #[must_use]
    pub fn balance(&self, account: AccountId) -> Decimal {
        self.balances.get(&account).copied().unwrap_or(Decimal::ZERO)
    }

    /// Value received by all accounts.
    #[must_use]
    pub fn total_transferred(&self) -> Decimal {
        self.balances.values().copied().sum()
    }

    fn credit(&mut self, to: AccountId, amount: Decimal) -> Result<(), TransferError> {
        if self.rejecting.contains(&to) {
            return Err(TransferError::new(format!("recipient {to} rejects payments")));
        }
        let entry = self.balances.entry(to).or_insert(Decimal::ZERO);
        *entry = entry
            .checked_add(amount)
            .ok_or_else(|| TransferError::new("recipient balance overflow"))?;
        Ok(())
    }
}

impl ValueTransfer for TransferLedger {
    fn transfer(
        &mut self,
        _engine: &mut Auction,
        to: AccountId,
        amount: Decimal,
    ) -> Result<(), TransferError> {
        self.credit(to, amount)
    }
}
