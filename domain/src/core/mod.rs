//! Core domain primitives shared by every module

pub mod agent_kind;
pub mod error;
pub mod request_id;

pub use agent_kind::AgentKind;
pub use error::DomainError;
pub use request_id::RequestId;
