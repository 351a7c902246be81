//! Evidence storage configuration from TOML (`[storage]` section)
//!
//! Example configuration:
//!
//! ```toml
//! [storage]
//! jwt = "eyJ..."
//! index_path = "/var/lib/rwa-oracle/evidence-map.json"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Content-addressed evidence storage configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    /// Pinning API endpoint
    pub api_url: String,
    /// Pinning API bearer token
    pub jwt: String,
    /// Public gateway prefix for resolving references
    pub gateway_url: String,
    /// Path of the durable request-id to reference index
    pub index_path: PathBuf,
}

impl Default for FileStorageConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.pinata.cloud/pinning/pinJSONToIPFS".to_string(),
            jwt: String::new(),
            gateway_url: "https://gateway.pinata.cloud/ipfs".to_string(),
            index_path: PathBuf::from("evidence-map.json"),
        }
    }
}

impl FileStorageConfig {
    /// Required values that are not set
    pub fn missing_required(&self) -> Vec<String> {
        if self.jwt.trim().is_empty() {
            vec!["storage.jwt".to_string()]
        } else {
            vec![]
        }
    }
}
