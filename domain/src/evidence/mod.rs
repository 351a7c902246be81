//! Evidence bundle - the immutable audit record for one run

use crate::consensus::result::ConsensusResult;
use crate::core::request_id::RequestId;
use crate::measurement::MeasurementRecord;
use crate::request::outcome::RequestOutcome;
use crate::valuation::response::AgentResponse;
use serde::{Deserialize, Serialize};

/// Content-addressed reference to an archived evidence bundle (Value Object)
///
/// Immutable and globally resolvable: anyone holding the reference can
/// fetch the exact bytes that were committed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvidenceReference(String);

impl EvidenceReference {
    /// Create a new reference
    ///
    /// # Panics
    /// Panics if the reference is empty or only whitespace
    pub fn new(reference: impl Into<String>) -> Self {
        let reference = reference.into();
        assert!(
            !reference.trim().is_empty(),
            "Evidence reference cannot be empty"
        );
        Self(reference)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EvidenceReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Full analysis trail for one verification run (Value Object)
///
/// Combines the measurement, every agent response (valid and failed),
/// the consensus statistics, and the final outcome. Serialized once and
/// pinned to content-addressed storage before anything reaches the
/// ledger, so every on-chain outcome is independently auditable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceBundle {
    pub request_id: RequestId,
    pub outcome: RequestOutcome,
    pub measurement: MeasurementRecord,
    /// All panel responses, failed ones included
    pub agent_responses: Vec<AgentResponse>,
    pub consensus: ConsensusResult,
    /// RFC 3339 timestamp of bundle assembly
    pub archived_at: String,
}

impl EvidenceBundle {
    pub fn new(
        request_id: RequestId,
        outcome: RequestOutcome,
        measurement: MeasurementRecord,
        agent_responses: Vec<AgentResponse>,
        consensus: ConsensusResult,
    ) -> Self {
        Self {
            request_id,
            outcome,
            measurement,
            agent_responses,
            consensus,
            archived_at: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        }
    }

    /// Artifact name hint for the storage layer
    ///
    /// E.g., request 8412093475012 -> "Evidence_8412093475.json"
    pub fn name_hint(&self) -> String {
        format!("Evidence_{}.json", self.request_id.short())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::result::ConsensusStatistics;
    use crate::core::agent_kind::AgentKind;

    fn bundle() -> EvidenceBundle {
        EvidenceBundle::new(
            RequestId::new("8412093475012"),
            RequestOutcome::Verified {
                valuation: 100_000,
                confidence: 90,
            },
            MeasurementRecord {
                latitude: 0.0,
                longitude: 0.0,
                area_sqm: 1.0,
                vegetation_index: 0.0,
                cloud_coverage_percent: 0.0,
                resolution_meters: 10.0,
                provider_name: "Sentinel-2".to_string(),
                captured_at: "2026-01-01T00:00:00Z".to_string(),
                rgb_image_url: None,
                vegetation_image_url: None,
            },
            vec![AgentResponse::failed(AgentKind::Gemini, "timeout")],
            ConsensusResult {
                final_valuation: 100_000.0,
                final_confidence: 90,
                consensus_score: 100,
                statistics: ConsensusStatistics {
                    mean: 100_000.0,
                    standard_deviation: 0.0,
                },
            },
        )
    }

    #[test]
    fn test_name_hint_uses_short_prefix() {
        assert_eq!(bundle().name_hint(), "Evidence_8412093475.json");
    }

    #[test]
    fn test_failed_responses_are_kept_for_audit() {
        let json = serde_json::to_value(bundle()).unwrap();
        assert_eq!(json["agentResponses"][0]["error"], "timeout");
        assert_eq!(json["requestId"], "8412093475012");
    }

    #[test]
    fn test_archived_at_is_rfc3339() {
        let bundle = bundle();
        assert!(chrono::DateTime::parse_from_rfc3339(&bundle.archived_at).is_ok());
    }

    #[test]
    #[should_panic]
    fn test_empty_reference_panics() {
        EvidenceReference::new(" ");
    }
}
