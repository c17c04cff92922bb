//! # gavel-types
//!
//! Shared types, errors, and configuration for the **Gavel** auction
//! settlement engine.
//!
//! This crate is the leaf dependency of the workspace. It defines:
//!
//! - **Identifiers**: [`AccountId`]
//! - **Lifecycle**: [`AuctionPhase`], [`LeadingBid`]
//! - **Audit trail**: [`Receipt`], [`ReceiptKind`]
//! - **Configuration**: [`EngineConfig`]
//! - **Errors**: [`AuctionError`] with `AU_ERR_` prefix codes, [`ErrorKind`]
//! - **Constants**: system-wide defaults

pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod phase;
pub mod receipt;

pub use config::*;
pub use error::*;
pub use ids::*;
pub use phase::*;
pub use receipt::*;

// Constants are accessed via `gavel_types::constants::FOO`.
