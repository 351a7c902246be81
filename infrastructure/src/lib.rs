//! Infrastructure layer for rwa-oracle
//!
//! Adapters implementing the application layer's ports against real
//! services: the geospatial measurement provider, the valuation agent
//! endpoints, the IPFS pinning API, the durable evidence index file, and
//! the oracle router's JSON-RPC surface. Configuration loading lives
//! here too.

pub mod agents;
pub mod config;
pub mod evidence;
pub mod ledger;
pub mod measurement;

// Re-export commonly used types
pub use agents::HttpValuationAgent;
pub use config::{ConfigLoader, FileConfig};
pub use evidence::{FileEvidenceIndex, PinataEvidenceStore};
pub use ledger::JsonRpcLedgerGateway;
pub use measurement::HttpMeasurementProvider;
