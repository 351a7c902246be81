//! AgentKind value object identifying a valuation provider

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Deployed valuation providers (Value Object)
///
/// Each kind names one independent provider in the panel. The set is a
/// stable enumeration, not free text: agent responses are correlated to
/// providers by this identifier in evidence bundles and logs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AgentKind {
    /// Groq-hosted appraisal agent
    Groq,
    /// OpenRouter-hosted appraisal agent
    OpenRouter,
    /// Gemini-hosted appraisal agent
    Gemini,
    /// Non-reference deployment
    Custom(String),
}

impl AgentKind {
    /// Get the string identifier for this agent
    pub fn as_str(&self) -> &str {
        match self {
            AgentKind::Groq => "groq",
            AgentKind::OpenRouter => "openrouter",
            AgentKind::Gemini => "gemini",
            AgentKind::Custom(s) => s,
        }
    }

    /// The reference deployment panel (N = 3)
    pub fn default_panel() -> Vec<AgentKind> {
        vec![AgentKind::Groq, AgentKind::OpenRouter, AgentKind::Gemini]
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AgentKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "groq" => AgentKind::Groq,
            "openrouter" => AgentKind::OpenRouter,
            "gemini" => AgentKind::Gemini,
            _ => AgentKind::Custom(s.to_string()),
        })
    }
}

impl Serialize for AgentKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AgentKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(s.parse().unwrap_or(AgentKind::Custom(s)))
    }
}
