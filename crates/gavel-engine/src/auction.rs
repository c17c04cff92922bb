//! The settlement engine.
//!
//! One [`Auction`] owns all state of a single English auction:
//! 1. `bid` escrows value and supersedes the current leader, whose amount
//!    becomes reclaimable
//! 2. `reclaim` pays an account its accumulated reclaimable balance
//! 3. `close` pays the winning bid to the beneficiary, exactly once
//!
//! `reclaim` and `close` hand control to an external [`ValueTransfer`],
//! which may call back into the engine before it returns. Both therefore
//! commit every ledger effect *before* the transfer, and compensate
//! explicitly if the transfer fails. Once effects are committed the call
//! succeeds; a conservation mismatch found afterwards is logged as a
//! safety alert, never returned.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use gavel_types::{
    AccountId, AuctionError, AuctionPhase, EngineConfig, LeadingBid, ReceiptKind, Result,
    constants,
};
use rust_decimal::Decimal;

use crate::conservation::ValueConservation;
use crate::journal::SettlementJournal;
use crate::transfer::ValueTransfer;

/// Single-asset English auction with a pull-based refund ledger.
#[derive(Debug)]
pub struct Auction {
    /// Only account allowed to close; receives the winning bid.
    beneficiary: AccountId,
    /// Current leader. Its amount is *not* in `reclaimable`.
    leading: Option<LeadingBid>,
    /// Amounts owed back to superseded bidders. Zero balances are removed.
    reclaimable: HashMap<AccountId, Decimal>,
    phase: AuctionPhase,
    /// Amount paid to the beneficiary, set when the auction closes.
    paid_out: Option<Decimal>,
    closed_at: Option<DateTime<Utc>>,
    /// Deposits vs. withdrawals.
    conservation: ValueConservation,
    journal: SettlementJournal,
    config: EngineConfig,
    /// External transfers currently in flight (nesting depth).
    depth: u32,
}

impl Auction {
    /// Create an open auction with default configuration.
    #[must_use]
    pub fn new(beneficiary: AccountId) -> Self {
        Self::build(beneficiary, EngineConfig::default())
    }

    /// Create an open auction with an explicit configuration.
    ///
    /// # Errors
    /// Returns [`AuctionError::Configuration`] if the config is invalid.
    pub fn with_config(beneficiary: AccountId, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(beneficiary, config))
    }

    fn build(beneficiary: AccountId, config: EngineConfig) -> Self {
        tracing::info!(
            engine = constants::ENGINE_NAME,
            version = constants::VERSION,
            beneficiary = %beneficiary,
            journal_capacity = config.journal_capacity,
            "Auction opened"
        );
        Self {
            beneficiary,
            leading: None,
            reclaimable: HashMap::new(),
            phase: AuctionPhase::Open,
            paid_out: None,
            closed_at: None,
            conservation: ValueConservation::new(),
            journal: SettlementJournal::new(config.journal_capacity),
            config,
            depth: 0,
        }
    }

    // -----------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------

    /// Place a bid of `amount`, which is the value escrowed with the call.
    ///
    /// On success the caller becomes the leader and the previous leader's
    /// amount is added to its reclaimable balance.
    ///
    /// # Errors
    /// - `AuctionClosed` once the auction has closed
    /// - `BidTooLow` if `amount <= highest_bid()` (ties lose)
    /// - `AmountNotRepresentable` if the engine could not hold `amount`
    ///   exactly alongside its current holdings
    ///
    /// No state changes on error.
    pub fn bid(&mut self, caller: AccountId, amount: Decimal) -> Result<()> {
        self.trace_reentry("bid", caller);

        if !self.phase.is_open() {
            tracing::warn!(caller = %caller.short(), %amount, "Bid rejected: auction closed");
            return Err(AuctionError::AuctionClosed);
        }

        let highest = self.highest_bid();
        if amount <= highest {
            tracing::warn!(
                caller = %caller.short(),
                offered = %amount,
                %highest,
                "Bid rejected: not above highest bid"
            );
            return Err(AuctionError::BidTooLow {
                offered: amount,
                highest,
            });
        }

        // Compute every new value before touching state.
        let superseded = match self.leading {
            Some(prev) => {
                let credited = self
                    .reclaimable_of(prev.bidder)
                    .checked_add(prev.amount)
                    .ok_or(AuctionError::AmountNotRepresentable {
                        amount: prev.amount,
                        held: self.conservation.expected_held(),
                    })?;
                Some((prev, credited))
            }
            None => None,
        };
        self.conservation.record_deposit(amount)?;

        if let Some((prev, credited)) = superseded {
            self.reclaimable.insert(prev.bidder, credited);
            self.journal
                .append(ReceiptKind::Outbid, prev.bidder, prev.amount);
        }
        self.leading = Some(LeadingBid {
            bidder: caller,
            amount,
        });
        self.journal.append(ReceiptKind::BidPlaced, caller, amount);

        tracing::info!(
            bidder = %caller.short(),
            %amount,
            outbid = ?superseded.map(|(prev, _)| prev.bidder.short()),
            "Bid accepted"
        );

        self.audit_conservation();
        Ok(())
    }

    /// Withdraw the caller's reclaimable balance through `transfer`.
    ///
    /// Returns the amount paid; zero (a no-op) when nothing is owed. The
    /// ledger entry is cleared before the transfer runs, so a reentrant
    /// `reclaim` by the same account observes nothing owed.
    ///
    /// # Errors
    /// Returns `TransferFailed` if the transfer fails; the balance is
    /// re-credited and the withdrawal un-recorded.
    pub fn reclaim<T>(&mut self, caller: AccountId, transfer: &mut T) -> Result<Decimal>
    where
        T: ValueTransfer + ?Sized,
    {
        self.trace_reentry("reclaim", caller);

        let owed = self.reclaimable_of(caller);
        if owed <= Decimal::ZERO {
            tracing::debug!(caller = %caller.short(), "Reclaim no-op: nothing owed");
            return Ok(Decimal::ZERO);
        }

        // Effects.
        self.reclaimable.remove(&caller);
        self.conservation.record_withdrawal(owed);

        // Interaction.
        self.depth += 1;
        let outcome = transfer.transfer(self, caller, owed);
        self.depth -= 1;

        if let Err(err) = outcome {
            // Add rather than overwrite: nested calls during the transfer may
            // have credited this account again. The sum stays bounded by total
            // deposits, which are overflow-checked.
            *self.reclaimable.entry(caller).or_insert(Decimal::ZERO) += owed;
            self.conservation.revert_withdrawal(owed);
            tracing::warn!(
                caller = %caller.short(),
                amount = %owed,
                reason = %err,
                "Reclaim transfer failed, balance restored"
            );
            return Err(AuctionError::TransferFailed {
                to: caller,
                amount: owed,
                reason: err.reason,
            });
        }

        self.journal.append(ReceiptKind::Reclaimed, caller, owed);
        tracing::info!(caller = %caller.short(), amount = %owed, "Reclaimed");

        self.audit_conservation();
        Ok(owed)
    }

    /// Close the auction and pay the winning bid to the beneficiary.
    ///
    /// The phase flips to CLOSED before the transfer runs, so a reentrant
    /// `close` is rejected and the payout happens once. With no bids the
    /// auction closes without a transfer. Returns the amount paid.
    ///
    /// # Errors
    /// - `Unauthorized` if `caller` is not the beneficiary
    /// - `AlreadyClosed` on any later call
    /// - `TransferFailed` if the payout fails; the auction is re-opened
    pub fn close<T>(&mut self, caller: AccountId, transfer: &mut T) -> Result<Decimal>
    where
        T: ValueTransfer + ?Sized,
    {
        self.trace_reentry("close", caller);

        if caller != self.beneficiary {
            tracing::warn!(caller = %caller.short(), "Close rejected: not the beneficiary");
            return Err(AuctionError::Unauthorized {
                caller,
                beneficiary: self.beneficiary,
            });
        }
        if !self.phase.is_open() {
            tracing::warn!("Close rejected: already closed");
            return Err(AuctionError::AlreadyClosed);
        }

        let payout = self.highest_bid();

        // Effects.
        self.phase = AuctionPhase::Closed;
        self.paid_out = Some(payout);
        self.closed_at = Some(Utc::now());

        // Interaction.
        if payout > Decimal::ZERO {
            let beneficiary = self.beneficiary;
            self.conservation.record_withdrawal(payout);
            self.depth += 1;
            let outcome = transfer.transfer(self, beneficiary, payout);
            self.depth -= 1;

            if let Err(err) = outcome {
                self.phase = AuctionPhase::Open;
                self.paid_out = None;
                self.closed_at = None;
                self.conservation.revert_withdrawal(payout);
                tracing::warn!(
                    amount = %payout,
                    reason = %err,
                    "Payout transfer failed, auction re-opened"
                );
                return Err(AuctionError::TransferFailed {
                    to: beneficiary,
                    amount: payout,
                    reason: err.reason,
                });
            }
        }

        self.journal
            .append(ReceiptKind::Closed, self.beneficiary, payout);
        tracing::info!(
            winner = ?self.leading.map(|bid| bid.bidder.short()),
            amount = %payout,
            journal_head = %hex::encode(self.journal.head()),
            "Auction closed"
        );

        self.audit_conservation();
        Ok(payout)
    }

    // -----------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------

    #[must_use]
    pub fn beneficiary(&self) -> AccountId {
        self.beneficiary
    }

    /// Current highest bid, zero before any bid.
    #[must_use]
    pub fn highest_bid(&self) -> Decimal {
        self.leading.map_or(Decimal::ZERO, |bid| bid.amount)
    }

    #[must_use]
    pub fn highest_bidder(&self) -> Option<AccountId> {
        self.leading.map(|bid| bid.bidder)
    }

    #[must_use]
    pub fn leading_bid(&self) -> Option<LeadingBid> {
        self.leading
    }

    #[must_use]
    pub fn reclaimable_of(&self, account: AccountId) -> Decimal {
        self.reclaimable
            .get(&account)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Sum of every reclaimable balance.
    #[must_use]
    pub fn total_reclaimable(&self) -> Decimal {
        self.reclaimable.values().copied().sum()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        !self.phase.is_open()
    }

    #[must_use]
    pub fn phase(&self) -> AuctionPhase {
        self.phase
    }

    /// Amount paid to the beneficiary, once closed.
    #[must_use]
    pub fn paid_out(&self) -> Option<Decimal> {
        self.paid_out
    }

    #[must_use]
    pub fn closed_at(&self) -> Option<DateTime<Utc>> {
        self.closed_at
    }

    /// Value the engine holds: the leading bid while open plus all
    /// reclaimable balances.
    #[must_use]
    pub fn held_value(&self) -> Decimal {
        let leading = if self.phase.is_open() {
            self.highest_bid()
        } else {
            Decimal::ZERO
        };
        leading + self.total_reclaimable()
    }

    /// Number of external transfers currently in flight.
    #[must_use]
    pub fn interaction_depth(&self) -> u32 {
        self.depth
    }

    #[must_use]
    pub fn conservation(&self) -> &ValueConservation {
        &self.conservation
    }

    #[must_use]
    pub fn journal(&self) -> &SettlementJournal {
        &self.journal
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Check value conservation now, regardless of configuration.
    pub fn verify_conservation(&self) -> Result<()> {
        self.conservation.verify(self.held_value())
    }

    fn audit_conservation(&self) {
        if !self.config.verify_conservation {
            return;
        }
        if let Err(err) = self.verify_conservation() {
            tracing::error!(error = %err, "SAFETY ALERT: value conservation check failed");
        }
    }

    fn trace_reentry(&self, operation: &'static str, caller: AccountId) {
        if self.depth > 0 {
            tracing::debug!(
                operation,
                caller = %caller.short(),
                depth = self.depth,
                "Reentrant call"
            );
        }
    }
}
