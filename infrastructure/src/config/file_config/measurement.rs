//! Measurement provider configuration from TOML (`[measurement]` section)
//!
//! Example configuration:
//!
//! ```toml
//! [measurement]
//! endpoint = "https://geo.example.com/measure"
//! timeout_secs = 60
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Measurement provider configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileMeasurementConfig {
    /// Measurement service endpoint URL
    pub endpoint: String,
    /// Request deadline in seconds
    pub timeout_secs: u64,
}

impl Default for FileMeasurementConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            timeout_secs: 60,
        }
    }
}

impl FileMeasurementConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Required values that are not set
    pub fn missing_required(&self) -> Vec<String> {
        if self.endpoint.trim().is_empty() {
            vec!["measurement.endpoint".to_string()]
        } else {
            vec![]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = FileMeasurementConfig::default();
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.missing_required(), vec!["measurement.endpoint"]);
    }

    #[test]
    fn test_deserialize() {
        let toml_str = r#"
[measurement]
endpoint = "https://geo.example.com/measure"
timeout_secs = 45
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.measurement.endpoint, "https://geo.example.com/measure");
        assert_eq!(config.measurement.timeout(), Duration::from_secs(45));
        assert!(config.measurement.missing_required().is_empty());
    }
}
