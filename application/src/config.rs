//! Pipeline parameters — orchestration policy knobs.
//!
//! [`PipelineParams`] groups the static parameters that control one
//! orchestration run. These are application-layer concerns, not domain
//! policy: the consensus algorithm itself is parameter-free.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Orchestration control parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineParams {
    /// Deadline for each individual agent invocation. The pool has no
    /// global deadline: invocations run in parallel, so pool latency is
    /// bounded by the slowest surviving invocation.
    pub agent_timeout: Duration,
    /// Consensus confidence below which the outcome is an explicit
    /// rejection rather than a verification.
    pub rejection_confidence_floor: u8,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            agent_timeout: Duration::from_secs(30),
            rejection_confidence_floor: 30,
        }
    }
}

impl PipelineParams {
    pub fn with_agent_timeout(mut self, timeout: Duration) -> Self {
        self.agent_timeout = timeout;
        self
    }

    pub fn with_rejection_confidence_floor(mut self, floor: u8) -> Self {
        self.rejection_confidence_floor = floor.min(100);
        self
    }
}
