//! Consensus reduction over valid agent responses
//!
//! Pure function of its inputs: given the same panel, the committed
//! numbers are exactly reproducible from the archived evidence bundle.
//! No response is discarded as an outlier — every valid panelist
//! contributes to the weighted mean.

use crate::consensus::result::{ConsensusResult, ConsensusStatistics};
use crate::valuation::response::AgentResponse;
use thiserror::Error;

/// Minimum number of valid responses a panel must produce
pub const MIN_VALID_RESPONSES: usize = 2;

/// Floor for the reported panel confidence. Confidence 1 is reserved for
/// the rejection sentinel at the ledger boundary.
pub const MIN_REPORTED_CONFIDENCE: u8 = 2;

/// Errors from consensus reduction
#[derive(Error, Debug)]
pub enum ConsensusError {
    #[error(
        "Insufficient valid agent responses: got {got}, need at least {MIN_VALID_RESPONSES}"
    )]
    InsufficientResponses { got: usize },

    #[error("Response from agent '{agent}' carries an error and cannot join consensus")]
    ErroredResponse { agent: String },
}

/// Reduce a valid panel to one valuation, confidence, and agreement score
///
/// - `final_valuation`: mean of the valuations weighted by each agent's
///   own confidence; an all-zero-confidence panel falls back to the
///   unweighted mean.
/// - `final_confidence`: unweighted mean of the confidences, so the
///   reported certainty is independent of how the valuation was weighted.
/// - `consensus_score`: `100 x (1 - sigma/mu)` over the raw valuations,
///   clamped to [0, 100]. Exact agreement scores 100; relative dispersion
///   at or beyond the mean scores 0.
pub fn compute_consensus(responses: &[AgentResponse]) -> Result<ConsensusResult, ConsensusError> {
    if let Some(errored) = responses.iter().find(|r| !r.is_valid()) {
        return Err(ConsensusError::ErroredResponse {
            agent: errored.agent.to_string(),
        });
    }
    if responses.len() < MIN_VALID_RESPONSES {
        return Err(ConsensusError::InsufficientResponses {
            got: responses.len(),
        });
    }

    let n = responses.len() as f64;
    let weight_sum: f64 = responses.iter().map(|r| f64::from(r.confidence)).sum();

    let final_valuation = if weight_sum == 0.0 {
        responses.iter().map(|r| r.valuation).sum::<f64>() / n
    } else {
        responses
            .iter()
            .map(|r| r.valuation * f64::from(r.confidence))
            .sum::<f64>()
            / weight_sum
    };

    let mean_confidence = weight_sum / n;
    let final_confidence = (mean_confidence.round() as u8)
        .clamp(MIN_REPORTED_CONFIDENCE, 100);

    let mean = responses.iter().map(|r| r.valuation).sum::<f64>() / n;
    let variance = responses
        .iter()
        .map(|r| (r.valuation - mean).powi(2))
        .sum::<f64>()
        / n;
    let standard_deviation = variance.sqrt();

    let consensus_score = if mean > 0.0 {
        ((1.0 - standard_deviation / mean) * 100.0)
            .clamp(0.0, 100.0)
            .round() as u8
    } else if standard_deviation == 0.0 {
        100
    } else {
        0
    };

    Ok(ConsensusResult {
        final_valuation,
        final_confidence,
        consensus_score,
        statistics: ConsensusStatistics {
            mean,
            standard_deviation,
        },
    })
}
