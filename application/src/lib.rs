//! Application layer for rwa-oracle
//!
//! This crate contains use cases, port definitions, and pipeline
//! parameters. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::PipelineParams;
pub use ports::{
    evidence_store::{ArchiveError, EvidenceIndex, EvidenceStore},
    ledger_gateway::{LedgerGateway, SubmissionError, TransactionHandle},
    measurement_provider::{MeasurementProvider, ProviderError},
    progress::{NoProgress, ProgressNotifier},
    valuation_agent::{AgentError, ValuationAgent},
};
pub use use_cases::evaluate_agents::EvaluateAgentsUseCase;
pub use use_cases::process_request::{
    ProcessRequestError, ProcessRequestOutput, ProcessRequestUseCase,
};
