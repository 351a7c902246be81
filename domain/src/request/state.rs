//! Request lifecycle state machine

use crate::core::error::DomainError;
use crate::request::outcome::RequestOutcome;
use serde::{Deserialize, Serialize};

/// Pipeline stage names, used to tag failures and progress events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Fetching the geospatial measurement
    Measurement,
    /// Running the valuation agent panel
    AgentEvaluation,
    /// Reducing agent responses to a consensus
    Consensus,
    /// Persisting the evidence bundle and index entry
    Archive,
    /// Committing the outcome to the ledger
    Submission,
}

impl PipelineStage {
    pub fn as_str(&self) -> &str {
        match self {
            PipelineStage::Measurement => "measurement",
            PipelineStage::AgentEvaluation => "agent_evaluation",
            PipelineStage::Consensus => "consensus",
            PipelineStage::Archive => "archive",
            PipelineStage::Submission => "submission",
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle state of one verification request
///
/// Transitions are strictly sequential and one-directional:
///
/// ```text
/// Received -> MeasurementFetched -> AgentsEvaluated -> ConsensusComputed
///          -> EvidenceArchived -> Submitted
/// ```
///
/// Any stage may instead terminate the run in `Failed`. There is no
/// retry-in-place transition: a retried request starts a fresh run from
/// `Received`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum RequestState {
    Received,
    MeasurementFetched,
    #[serde(rename_all = "camelCase")]
    AgentsEvaluated { valid: usize, failed: usize },
    ConsensusComputed,
    EvidenceArchived,
    Submitted(RequestOutcome),
    #[serde(rename_all = "camelCase")]
    Failed { stage: PipelineStage, cause: String },
}

impl RequestState {
    /// Position in the forward chain; `Failed` has no position
    fn ordinal(&self) -> Option<u8> {
        match self {
            RequestState::Received => Some(0),
            RequestState::MeasurementFetched => Some(1),
            RequestState::AgentsEvaluated { .. } => Some(2),
            RequestState::ConsensusComputed => Some(3),
            RequestState::EvidenceArchived => Some(4),
            RequestState::Submitted(_) => Some(5),
            RequestState::Failed { .. } => None,
        }
    }

    /// Advance to the next state in the chain
    ///
    /// Fails on any transition that skips a stage, moves backwards, or
    /// leaves a terminal state. `Failed` is reached via [`Self::failed`],
    /// never through `advance`.
    pub fn advance(self, next: RequestState) -> Result<RequestState, DomainError> {
        if self.is_terminal() {
            return Err(DomainError::AlreadyTerminal(self.to_string()));
        }

        match (self.ordinal(), next.ordinal()) {
            (Some(from), Some(to)) if to == from + 1 => Ok(next),
            _ => Err(DomainError::InvalidTransition {
                from: self.to_string(),
                to: next.to_string(),
            }),
        }
    }

    /// Terminal failure state for the given stage
    pub fn failed(stage: PipelineStage, cause: impl Into<String>) -> RequestState {
        RequestState::Failed {
            stage,
            cause: cause.into(),
        }
    }

    /// Whether this state ends the run
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RequestState::Submitted(_) | RequestState::Failed { .. }
        )
    }
}

impl std::fmt::Display for RequestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestState::Received => write!(f, "received"),
            RequestState::MeasurementFetched => write!(f, "measurement_fetched"),
            RequestState::AgentsEvaluated { valid, failed } => {
                write!(f, "agents_evaluated ({valid} valid, {failed} failed)")
            }
            RequestState::ConsensusComputed => write!(f, "consensus_computed"),
            RequestState::EvidenceArchived => write!(f, "evidence_archived"),
            RequestState::Submitted(outcome) => write!(f, "submitted: {outcome}"),
            RequestState::Failed { stage, cause } => write!(f, "failed at {stage}: {cause}"),
        }
    }
}
