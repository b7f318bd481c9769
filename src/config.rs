//! Runtime configuration for reconciliation and bill creation

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::types::*;

/// Settings shared by the reconciliation engine and the creation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Application name presented to the ledger when a session is opened
    #[serde(default = "default_app_name")]
    pub app_name: String,
    /// Line amounts closer than this are treated as equal
    #[serde(default = "default_amount_tolerance")]
    pub amount_tolerance: BigDecimal,
    /// Prefix for placeholder ids given to bills not yet in the ledger
    #[serde(default)]
    pub synthetic_id_prefix: String,
}

fn default_app_name() -> String {
    "Service Bills Sync".to_string()
}

fn default_amount_tolerance() -> BigDecimal {
    BigDecimal::new(1.into(), 2)
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            amount_tolerance: default_amount_tolerance(),
            synthetic_id_prefix: String::new(),
        }
    }
}

impl SyncConfig {
    /// Parse a configuration from JSON, filling unspecified fields with defaults
    pub fn from_json(json: &str) -> LedgerResult<Self> {
        let config: SyncConfig =
            serde_json::from_str(json).map_err(|e| LedgerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> LedgerResult<()> {
        if self.app_name.trim().is_empty() {
            return Err(LedgerError::Config(
                "Application name cannot be empty".to_string(),
            ));
        }

        if self.amount_tolerance < BigDecimal::from(0) {
            return Err(LedgerError::Config(format!(
                "Amount tolerance cannot be negative: {}",
                self.amount_tolerance
            )));
        }

        Ok(())
    }
}
