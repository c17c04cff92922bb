//! System-wide constants for the Gavel settlement engine.

/// Default number of receipts retained by the settlement journal.
pub const DEFAULT_JOURNAL_CAPACITY: usize = 10_000;

/// Domain separator prefixed to every receipt hash.
pub const RECEIPT_DOMAIN: &[u8] = b"gavel:receipt:v1:";

/// Hash used as `prev_hash` by the very first receipt.
pub const GENESIS_HASH: [u8; 32] = [0u8; 32];

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "Gavel";
