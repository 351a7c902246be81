//! Ledger configuration from TOML (`[ledger]` section)
//!
//! Example configuration:
//!
//! ```toml
//! [ledger]
//! rpc_url = "https://router.example.com/rpc"
//! router_address = "0x52f8..."
//! poll_interval_secs = 15
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Oracle router RPC configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLedgerConfig {
    /// Oracle router RPC endpoint
    pub rpc_url: String,
    /// On-chain address of the oracle router contract
    pub router_address: String,
    /// Seconds between polls for pending requests
    pub poll_interval_secs: u64,
}

impl Default for FileLedgerConfig {
    fn default() -> Self {
        Self {
            rpc_url: String::new(),
            router_address: String::new(),
            poll_interval_secs: 15,
        }
    }
}

impl FileLedgerConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Required values that are not set
    pub fn missing_required(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if self.rpc_url.trim().is_empty() {
            missing.push("ledger.rpc_url".to_string());
        }
        if self.router_address.trim().is_empty() {
            missing.push("ledger.router_address".to_string());
        }
        missing
    }
}
