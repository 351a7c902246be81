//! Consensus result value objects

use serde::{Deserialize, Serialize};

/// Dispersion statistics over the raw valuations of the valid panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsensusStatistics {
    /// Unweighted arithmetic mean of the raw valuations
    pub mean: f64,
    /// Population standard deviation, same unit as the valuations
    pub standard_deviation: f64,
}

/// Reduced outcome of a valid agent panel (Value Object)
///
/// `final_confidence` reports how sure the panel is; `consensus_score`
/// reports how much the panel agrees with itself. The two are
/// independent: a panel can be individually confident and still
/// disagree wildly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsensusResult {
    /// Confidence-weighted mean valuation
    pub final_valuation: f64,
    /// Mean of the panel's confidence values, percent in [2, 100]
    pub final_confidence: u8,
    /// Inter-agent agreement in [0, 100]
    pub consensus_score: u8,
    /// Dispersion of the raw valuations
    pub statistics: ConsensusStatistics,
}
