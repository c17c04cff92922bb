//! Error types for the Gavel settlement engine.
//!
//! All errors use the `AU_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Bid validation errors
//! - 2xx: Authorization errors
//! - 3xx: Lifecycle state errors
//! - 4xx: Value transfer errors
//! - 8xx: Safety / invariant errors
//! - 9xx: General / internal errors

use rust_decimal::Decimal;
use thiserror::Error;

use crate::AccountId;

/// Coarse classification of an [`AuctionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request was malformed for the current bid level; retry with other input.
    Validation,
    /// The caller is not allowed to perform the operation.
    Authorization,
    /// The operation does not apply in the auction's current phase.
    State,
    /// The external value-transfer primitive refused the payment.
    Transfer,
    /// An internal invariant or configuration problem.
    Internal,
}

/// Central error enum for all Gavel operations.
#[derive(Debug, Error)]
pub enum AuctionError {
    // =================================================================
    // Bid Validation Errors (1xx)
    // =================================================================
    /// The offered amount does not strictly exceed the current highest bid.
    #[error("AU_ERR_100: Bid too low: offered {offered}, highest is {highest}")]
    BidTooLow { offered: Decimal, highest: Decimal },

    /// The amount cannot be added to the current holdings without overflow
    /// or rounding. Retrying with fewer decimal places, or after holdings
    /// shrink, can succeed.
    #[error("AU_ERR_101: Amount {amount} not representable alongside holdings of {held}")]
    AmountNotRepresentable { amount: Decimal, held: Decimal },

    // =================================================================
    // Authorization Errors (2xx)
    // =================================================================
    /// Only the beneficiary may close the auction.
    #[error("AU_ERR_200: Unauthorized: {caller} is not the beneficiary {beneficiary}")]
    Unauthorized {
        caller: AccountId,
        beneficiary: AccountId,
    },

    // =================================================================
    // Lifecycle State Errors (3xx)
    // =================================================================
    /// Bids are not accepted once the auction has closed.
    #[error("AU_ERR_300: Auction is closed")]
    AuctionClosed,

    /// The auction has already been closed and paid out.
    #[error("AU_ERR_301: Auction already closed")]
    AlreadyClosed,

    // =================================================================
    // Transfer Errors (4xx)
    // =================================================================
    /// The value-transfer primitive reported failure; the operation was rolled back.
    #[error("AU_ERR_400: Transfer of {amount} to {to} failed: {reason}")]
    TransferFailed {
        to: AccountId,
        amount: Decimal,
        reason: String,
    },

    // =================================================================
    // Safety Errors (8xx)
    // =================================================================
    /// Value conservation invariant violated — critical safety alert.
    #[error("AU_ERR_800: Conservation violation: {reason}")]
    ConservationViolation { reason: String },

    /// A journal receipt does not link to its predecessor or its hash is wrong.
    #[error("AU_ERR_801: Journal corrupted at sequence {sequence}")]
    JournalCorrupted { sequence: u64 },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Configuration error (invalid values, missing fields, etc.).
    #[error("AU_ERR_900: Configuration error: {0}")]
    Configuration(String),

    /// Serialization / deserialization error.
    #[error("AU_ERR_901: Serialization error: {0}")]
    Serialization(String),
}

impl AuctionError {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BidTooLow { .. } | Self::AmountNotRepresentable { .. } => ErrorKind::Validation,
            Self::Unauthorized { .. } => ErrorKind::Authorization,
            Self::AuctionClosed | Self::AlreadyClosed => ErrorKind::State,
            Self::TransferFailed { .. } => ErrorKind::Transfer,
            Self::ConservationViolation { .. }
            | Self::JournalCorrupted { .. }
            | Self::Configuration(_)
            | Self::Serialization(_) => ErrorKind::Internal,
        }
    }

    /// Whether the same caller may succeed by retrying with different input.
    /// True exactly for validation errors.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, AuctionError>;

impl From<serde_json::Error> for AuctionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
