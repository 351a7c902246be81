//! Valuation agent port
//!
//! Defines the interface to one independent valuation provider.

use async_trait::async_trait;
use oracle_domain::{AgentKind, AgentResponse, EvaluationPackage};
use thiserror::Error;

/// Errors from a single agent invocation
///
/// Never fatal to the request on their own: the agent pool converts them
/// into failed [`AgentResponse`]s and lets the consensus precondition
/// decide whether enough of the panel survived.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Agent request failed: {0}")]
    RequestFailed(String),

    #[error("Agent returned malformed output: {0}")]
    MalformedResponse(String),

    #[error("Agent reported an error: {0}")]
    Reported(String),
}

/// One independent valuation provider
///
/// Implementations are argument-in/result-out with no shared state:
/// concurrent invocations for the same package must not observe one
/// another.
#[async_trait]
pub trait ValuationAgent: Send + Sync {
    /// Which provider this is
    fn kind(&self) -> AgentKind;

    /// Appraise one evaluation package
    async fn evaluate(&self, package: &EvaluationPackage) -> Result<AgentResponse, AgentError>;
}
