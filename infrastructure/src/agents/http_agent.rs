//! HTTP adapter for one valuation agent service

use async_trait::async_trait;
use oracle_application::ports::valuation_agent::{AgentError, ValuationAgent};
use oracle_domain::{AgentKind, AgentResponse, EvaluationPackage};
use serde::Deserialize;
use tracing::{debug, warn};

/// Valuation agent client
///
/// Each instance represents one panelist: it posts the evaluation
/// package to that provider's endpoint and parses the uniform agent
/// envelope. The per-invocation deadline is enforced by the agent pool,
/// not here, so a slow provider is terminated without tying up the
/// client.
pub struct HttpValuationAgent {
    client: reqwest::Client,
    kind: AgentKind,
    url: String,
    api_key: Option<String>,
}

impl HttpValuationAgent {
    pub fn new(
        client: reqwest::Client,
        kind: AgentKind,
        url: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            kind,
            url: url.into(),
            api_key,
        }
    }
}

/// Wire shape of the agent envelope
///
/// Providers report failures in-band via `error`; every other field is
/// only trusted when `error` is absent.
#[derive(Debug, Deserialize)]
struct AgentWire {
    valuation: Option<f64>,
    confidence: Option<f64>,
    #[serde(default)]
    reasoning: String,
    #[serde(default)]
    risk_factors: Vec<String>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

fn parse_agent_body(kind: &AgentKind, body: &str) -> Result<AgentResponse, AgentError> {
    let wire: AgentWire =
        serde_json::from_str(body).map_err(|e| AgentError::MalformedResponse(e.to_string()))?;

    if let Some(error) = wire.error {
        return Err(AgentError::Reported(error));
    }

    let valuation = wire
        .valuation
        .ok_or_else(|| AgentError::MalformedResponse("missing valuation".to_string()))?;
    let confidence = wire
        .confidence
        .ok_or_else(|| AgentError::MalformedResponse("missing confidence".to_string()))?;

    if !valuation.is_finite() || valuation < 0.0 {
        return Err(AgentError::MalformedResponse(format!(
            "valuation out of range: {valuation}"
        )));
    }
    if !confidence.is_finite() || !(0.0..=100.0).contains(&confidence) {
        warn!(agent = %kind, confidence, "confidence out of range, clamping");
    }

    let confidence = confidence.round().clamp(0.0, 100.0) as u8;
    let mut response = AgentResponse::valued(
        kind.clone(),
        valuation,
        confidence,
        wire.reasoning,
        wire.risk_factors,
    );
    if let Some(currency) = wire.currency {
        response = response.with_currency(currency);
    }

    Ok(response)
}

#[async_trait]
impl ValuationAgent for HttpValuationAgent {
    fn kind(&self) -> AgentKind {
        self.kind.clone()
    }

    async fn evaluate(&self, package: &EvaluationPackage) -> Result<AgentResponse, AgentError> {
        debug!(agent = %self.kind, request = %package.request_id, "invoking agent");

        let mut request = self.client.post(&self.url).json(package);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AgentError::RequestFailed(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AgentError::RequestFailed(e.to_string()))?;

        if !status.is_success() {
            return Err(AgentError::RequestFailed(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }

        parse_agent_body(&self.kind, &body)
    }
}
