//! Agent response value object

use crate::core::agent_kind::AgentKind;
use serde::{Deserialize, Serialize};

/// Pipeline valuation unit. Responses tagged with any other currency are
/// excluded from consensus.
pub const PIPELINE_CURRENCY: &str = "USD";

/// One agent's appraisal of one asset (Value Object)
///
/// Created once per orchestration run per agent and never mutated. A
/// response either carries a valuation or an error, never both: when
/// `error` is set the numeric fields are zeroed and must not join
/// consensus. Failed responses are still archived for audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentResponse {
    /// The provider that produced this response
    pub agent: AgentKind,
    /// Estimated value, non-negative, in [`PIPELINE_CURRENCY`]
    pub valuation: f64,
    /// The agent's own confidence, integer percent in [0, 100]
    pub confidence: u8,
    /// Free-text justification, opaque to consensus, kept for audit
    pub reasoning: String,
    /// Short risk descriptors, kept for audit
    pub risk_factors: Vec<String>,
    /// Currency tag, when the provider reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Set if and only if this agent failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AgentResponse {
    /// Creates a successful appraisal.
    ///
    /// Confidence is clamped into [0, 100]; valuation is clamped to be
    /// non-negative.
    pub fn valued(
        agent: AgentKind,
        valuation: f64,
        confidence: u8,
        reasoning: impl Into<String>,
        risk_factors: Vec<String>,
    ) -> Self {
        Self {
            agent,
            valuation: valuation.max(0.0),
            confidence: confidence.min(100),
            reasoning: reasoning.into(),
            risk_factors,
            currency: None,
            error: None,
        }
    }

    /// Creates a failed response for an agent that crashed, timed out,
    /// or returned unusable output.
    pub fn failed(agent: AgentKind, error: impl Into<String>) -> Self {
        Self {
            agent,
            valuation: 0.0,
            confidence: 0,
            reasoning: String::new(),
            risk_factors: Vec::new(),
            currency: None,
            error: Some(error.into()),
        }
    }

    /// Attach the currency tag reported by the provider.
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Returns `true` if this response may contribute to consensus.
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    /// Returns `true` if the currency tag, when present, names a unit
    /// other than the pipeline unit.
    pub fn has_foreign_currency(&self) -> bool {
        self.currency
            .as_deref()
            .is_some_and(|c| !c.eq_ignore_ascii_case(PIPELINE_CURRENCY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valued_response() {
        let response = AgentResponse::valued(
            AgentKind::Groq,
            250_000.0,
            85,
            "Clear title, area matches imagery",
            vec!["flood zone".to_string()],
        );
        assert!(response.is_valid());
        assert_eq!(response.confidence, 85);
        assert!(response.error.is_none());
    }

    #[test]
    fn test_failed_response_is_invalid() {
        let response = AgentResponse::failed(AgentKind::Gemini, "Agent timeout");
        assert!(!response.is_valid());
        assert_eq!(response.valuation, 0.0);
        assert_eq!(response.confidence, 0);
    }

    #[test]
    fn test_confidence_clamped() {
        let response = AgentResponse::valued(AgentKind::Groq, 1.0, 150, "", vec![]);
        assert_eq!(response.confidence, 100);
    }

    #[test]
    fn test_negative_valuation_clamped() {
        let response = AgentResponse::valued(AgentKind::Groq, -5.0, 50, "", vec![]);
        assert_eq!(response.valuation, 0.0);
    }

    #[test]
    fn test_foreign_currency_detection() {
        let usd = AgentResponse::valued(AgentKind::Groq, 1.0, 50, "", vec![]).with_currency("usd");
        assert!(!usd.has_foreign_currency());

        let inr = AgentResponse::valued(AgentKind::Groq, 1.0, 50, "", vec![]).with_currency("INR");
        assert!(inr.has_foreign_currency());

        let untagged = AgentResponse::valued(AgentKind::Groq, 1.0, 50, "", vec![]);
        assert!(!untagged.has_foreign_currency());
    }

    #[test]
    fn test_error_field_omitted_when_valid() {
        let response = AgentResponse::valued(AgentKind::Groq, 1.0, 50, "ok", vec![]);
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("error").is_none());
        assert_eq!(json["riskFactors"], serde_json::json!([]));
    }
}
