//! Progress notification port
//!
//! Defines the interface for reporting pipeline progress during request
//! processing.

use oracle_domain::{AgentKind, PipelineStage};

/// Callback for progress updates during an orchestration run
///
/// Implementations live at the edges (console logging, metrics) and must
/// tolerate being called from concurrent agent tasks.
pub trait ProgressNotifier: Send + Sync {
    /// Called when a pipeline stage starts
    fn on_stage_start(&self, stage: PipelineStage);

    /// Called when one agent invocation finishes within the evaluation stage
    fn on_agent_complete(&self, agent: &AgentKind, success: bool);

    /// Called when a pipeline stage completes
    fn on_stage_complete(&self, stage: PipelineStage);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_stage_start(&self, _stage: PipelineStage) {}
    fn on_agent_complete(&self, _agent: &AgentKind, _success: bool) {}
    fn on_stage_complete(&self, _stage: PipelineStage) {}
}
