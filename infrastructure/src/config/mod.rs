//! Configuration loading and models

pub mod file_config;
pub mod loader;

pub use file_config::{
    FileAgentEndpoint, FileAgentsConfig, FileConfig, FileLedgerConfig, FileMeasurementConfig,
    FilePipelineConfig, FileStorageConfig,
};
pub use loader::ConfigLoader;
