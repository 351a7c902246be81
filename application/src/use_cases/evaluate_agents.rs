//! Valuation agent pool use case
//!
//! Fans one evaluation package out to every configured agent
//! concurrently and joins the results. Each invocation is isolated: a
//! crash, malformed output, or timeout in one provider becomes a failed
//! [`AgentResponse`] without cancelling or affecting siblings.

use crate::ports::progress::ProgressNotifier;
use crate::ports::valuation_agent::ValuationAgent;
use oracle_domain::{AgentKind, AgentResponse, EvaluationPackage};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Use case for running the valuation agent panel
///
/// The pool itself never fails: it always returns one response per
/// configured agent. Whether enough of the panel survived is the
/// consensus engine's precondition, not the pool's.
pub struct EvaluateAgentsUseCase {
    agents: Vec<Arc<dyn ValuationAgent>>,
    timeout: Duration,
}

impl EvaluateAgentsUseCase {
    pub fn new(agents: Vec<Arc<dyn ValuationAgent>>, timeout: Duration) -> Self {
        Self { agents, timeout }
    }

    /// Evaluate the package on every agent concurrently
    ///
    /// Returns when every invocation has completed or been terminated at
    /// its individual deadline. Response order carries no meaning.
    pub async fn evaluate(
        &self,
        package: &EvaluationPackage,
        progress: &dyn ProgressNotifier,
    ) -> Vec<AgentResponse> {
        let mut join_set = JoinSet::new();

        for agent in &self.agents {
            let agent = Arc::clone(agent);
            let package = package.clone();
            let deadline = self.timeout;

            join_set.spawn(async move {
                let kind = agent.kind();
                let response = match tokio::time::timeout(deadline, agent.evaluate(&package)).await
                {
                    Ok(Ok(response)) => screen(kind.clone(), response),
                    Ok(Err(e)) => AgentResponse::failed(kind.clone(), e.to_string()),
                    Err(_) => AgentResponse::failed(
                        kind.clone(),
                        format!("Agent timed out after {} seconds", deadline.as_secs()),
                    ),
                };
                (kind, response)
            });
        }

        let mut responses = Vec::with_capacity(self.agents.len());

        while let Some(result) = join_set.join_next().await {
            match result {
                Ok((kind, response)) => {
                    if response.is_valid() {
                        info!(
                            agent = %kind,
                            valuation = response.valuation,
                            confidence = response.confidence,
                            "agent responded"
                        );
                    } else {
                        warn!(agent = %kind, error = response.error.as_deref(), "agent failed");
                    }
                    progress.on_agent_complete(&kind, response.is_valid());
                    responses.push(response);
                }
                Err(e) => {
                    warn!("agent task join error: {e}");
                }
            }
        }

        // A panicked task yields no response above; fill in failures for
        // any missing panelists so callers always see one response per
        // configured agent.
        if responses.len() < self.agents.len() {
            for agent in &self.agents {
                let kind = agent.kind();
                if !responses.iter().any(|r| r.agent == kind) {
                    progress.on_agent_complete(&kind, false);
                    responses.push(AgentResponse::failed(kind, "Agent task aborted"));
                }
            }
        }

        responses
    }
}

/// Screen one successful invocation before it joins the panel
///
/// Forces the agent label to the invoking slot (responses are correlated
/// by who was asked, not by what the body claims) and demotes responses
/// valued in a non-pipeline currency to failures.
fn screen(kind: AgentKind, mut response: AgentResponse) -> AgentResponse {
    response.agent = kind.clone();

    if response.has_foreign_currency() {
        let currency = response.currency.unwrap_or_default();
        return AgentResponse::failed(kind, format!("Unsupported valuation currency: {currency}"));
    }

    response
}
