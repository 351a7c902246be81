//! Valuation agent adapters

pub mod http_agent;

pub use http_agent::HttpValuationAgent;
