//! Ledger-visible request outcome

use serde::{Deserialize, Serialize};

/// Ledger encoding of an explicit rejection: zero valuation with the
/// minimum confidence the contract accepts. The consensus engine never
/// reports confidence 1 (its floor is 2), so this pair is unambiguous
/// on-chain: it means "processed and rejected", while an absent outcome
/// means "never processed".
pub const REJECTION_SENTINEL: (u64, u8) = (0, 1);

/// Final outcome of one verification run (Value Object)
///
/// Rejection is a valid business outcome, not a failure: a rejected
/// request still archived its evidence and reached the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum RequestOutcome {
    /// The panel verified the asset at the given valuation
    #[serde(rename_all = "camelCase")]
    Verified { valuation: u64, confidence: u8 },
    /// The panel reviewed the asset and rejected it
    #[serde(rename_all = "camelCase")]
    Rejected { reason: String },
}

impl RequestOutcome {
    /// The `(valuation, confidence)` pair committed to the ledger
    pub fn ledger_encoding(&self) -> (u64, u8) {
        match self {
            RequestOutcome::Verified {
                valuation,
                confidence,
            } => (*valuation, *confidence),
            RequestOutcome::Rejected { .. } => REJECTION_SENTINEL,
        }
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, RequestOutcome::Verified { .. })
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, RequestOutcome::Rejected { .. })
    }
}

impl std::fmt::Display for RequestOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestOutcome::Verified {
                valuation,
                confidence,
            } => write!(f, "verified (${valuation}, {confidence}% confidence)"),
            RequestOutcome::Rejected { reason } => write!(f, "rejected ({reason})"),
        }
    }
}
