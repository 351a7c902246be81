//! Valuation agent configuration from TOML (`[agents]` section)
//!
//! One endpoint entry per panelist. The reference deployment runs three
//! independent providers; a deployment may swap in others, but the
//! consensus precondition needs at least two.
//!
//! Example configuration:
//!
//! ```toml
//! [agents]
//! timeout_secs = 30
//!
//! [[agents.endpoints]]
//! kind = "groq"
//! url = "https://agents.example.com/groq"
//! api_key = "sk-..."
//! ```

use oracle_domain::{AgentKind, MIN_VALID_RESPONSES};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One agent endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileAgentEndpoint {
    /// Agent identifier ("groq", "openrouter", "gemini", or custom)
    pub kind: String,
    /// Agent service endpoint URL
    pub url: String,
    /// Bearer token, if the endpoint requires one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl FileAgentEndpoint {
    pub fn parse_kind(&self) -> AgentKind {
        self.kind.parse().unwrap_or(AgentKind::Custom(self.kind.clone()))
    }
}

/// Valuation agent panel configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentsConfig {
    /// Per-invocation deadline in seconds
    pub timeout_secs: u64,
    /// The panel
    pub endpoints: Vec<FileAgentEndpoint>,
}

impl Default for FileAgentsConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            endpoints: AgentKind::default_panel()
                .into_iter()
                .map(|kind| FileAgentEndpoint {
                    kind: kind.to_string(),
                    url: String::new(),
                    api_key: None,
                })
                .collect(),
        }
    }
}

impl FileAgentsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Required values that are not set
    pub fn missing_required(&self) -> Vec<String> {
        let mut missing: Vec<String> = self
            .endpoints
            .iter()
            .filter(|e| e.url.trim().is_empty())
            .map(|e| format!("agents.endpoints[{}].url", e.kind))
            .collect();

        if self.endpoints.len() < MIN_VALID_RESPONSES {
            missing.push(format!(
                "agents.endpoints (need at least {MIN_VALID_RESPONSES})"
            ));
        }

        missing
    }
}
