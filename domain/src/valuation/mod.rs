//! Valuation agent input and output types

pub mod package;
pub mod response;

pub use package::EvaluationPackage;
pub use response::{AgentResponse, PIPELINE_CURRENCY};
