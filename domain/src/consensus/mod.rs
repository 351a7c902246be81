//! Consensus engine - reduction of agent panels to a single outcome

pub mod engine;
pub mod result;

pub use engine::{
    ConsensusError, MIN_REPORTED_CONFIDENCE, MIN_VALID_RESPONSES, compute_consensus,
};
pub use result::{ConsensusResult, ConsensusStatistics};
