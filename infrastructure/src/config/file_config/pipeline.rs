//! Pipeline policy configuration from TOML (`[pipeline]` section)
//!
//! Example configuration:
//!
//! ```toml
//! [pipeline]
//! rejection_confidence_floor = 30
//! ```

use serde::{Deserialize, Serialize};

/// Orchestration policy knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePipelineConfig {
    /// Consensus confidence (percent) below which the outcome is an
    /// explicit rejection. The original agents report 0-30 confidence
    /// for documents they reject, hence the default.
    pub rejection_confidence_floor: u8,
}

impl Default for FilePipelineConfig {
    fn default() -> Self {
        Self {
            rejection_confidence_floor: 30,
        }
    }
}
