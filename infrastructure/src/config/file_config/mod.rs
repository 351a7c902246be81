//! File-based configuration model
//!
//! [`FileConfig`] is the merged view of every configuration source (see
//! [`super::loader::ConfigLoader`]). Each section has serde defaults so a
//! partial file only overrides what it names.

pub mod agents;
pub mod ledger;
pub mod measurement;
pub mod pipeline;
pub mod storage;

pub use agents::{FileAgentEndpoint, FileAgentsConfig};
pub use ledger::FileLedgerConfig;
pub use measurement::FileMeasurementConfig;
pub use pipeline::FilePipelineConfig;
pub use storage::FileStorageConfig;

use oracle_application::PipelineParams;
use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub measurement: FileMeasurementConfig,
    pub agents: FileAgentsConfig,
    pub storage: FileStorageConfig,
    pub ledger: FileLedgerConfig,
    pub pipeline: FilePipelineConfig,
}

impl FileConfig {
    /// Every required value that is not set, across all sections
    ///
    /// Collected in one pass so startup can report the full list at
    /// once instead of failing key by key.
    pub fn missing_required(&self) -> Vec<String> {
        let mut missing = self.measurement.missing_required();
        missing.extend(self.agents.missing_required());
        missing.extend(self.storage.missing_required());
        missing.extend(self.ledger.missing_required());
        missing
    }

    /// Pipeline parameters for the orchestrator
    pub fn pipeline_params(&self) -> PipelineParams {
        PipelineParams::default()
            .with_agent_timeout(self.agents.timeout())
            .with_rejection_confidence_floor(self.pipeline.rejection_confidence_floor)
    }
}
