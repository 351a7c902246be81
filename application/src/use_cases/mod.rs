//! Use cases - the orchestration and fan-out logic

pub mod evaluate_agents;
pub mod process_request;

pub use evaluate_agents::EvaluateAgentsUseCase;
pub use process_request::{ProcessRequestError, ProcessRequestOutput, ProcessRequestUseCase};
