//! Configuration for a settlement engine instance.

use serde::{Deserialize, Serialize};

use crate::{AuctionError, Result, constants};

/// Tunables for one settlement engine instance.
///
/// Missing JSON fields fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Receipts retained by the audit journal before the oldest are evicted.
    pub journal_capacity: usize,
    /// Re-check value conservation after every successful operation.
    pub verify_conservation: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            journal_capacity: constants::DEFAULT_JOURNAL_CAPACITY,
            verify_conservation: true,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.journal_capacity == 0 {
            return Err(AuctionError::Configuration(
                "journal_capacity must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
