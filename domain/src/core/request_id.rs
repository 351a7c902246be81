//! RequestId value object

use serde::{Deserialize, Serialize};

/// Ledger-assigned identifier for a verification request (Value Object)
///
/// The primary correlation key across every pipeline stage: agent
/// evaluation packages, evidence bundles, the evidence index, and the
/// on-chain submission are all keyed by it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    /// Create a new request id
    ///
    /// # Panics
    /// Panics if the id is empty or only whitespace
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        assert!(!id.trim().is_empty(), "Request id cannot be empty");
        Self(id)
    }

    /// Try to create a new request id, returning None if invalid
    pub fn try_new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.trim().is_empty() { None } else { Some(Self(id)) }
    }

    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short prefix used in evidence artifact names
    ///
    /// E.g., "8412093475012" -> "8412093475"
    pub fn short(&self) -> &str {
        let end = self.0.len().min(10);
        &self.0[..end]
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        RequestId::new(s)
    }
}

impl From<String> for RequestId {
    fn from(s: String) -> Self {
        RequestId::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_creation() {
        let id = RequestId::new("42");
        assert_eq!(id.as_str(), "42");
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    #[should_panic]
    fn test_empty_request_id_panics() {
        RequestId::new("  ");
    }

    #[test]
    fn test_try_new() {
        assert!(RequestId::try_new("").is_none());
        assert!(RequestId::try_new("17").is_some());
    }

    #[test]
    fn test_short_prefix() {
        assert_eq!(RequestId::new("12345678901234").short(), "1234567890");
        assert_eq!(RequestId::new("7").short(), "7");
    }

    #[test]
    fn test_serde_transparent() {
        let id = RequestId::new("99");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"99\"");
    }
}
