//! Configuration for the question generator

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for question drafting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Maximum time for one strategy attempt (seconds)
    pub generation_timeout_secs: u64,

    /// Maximum evidence snippets passed to a strategy
    pub max_evidence: usize,

    /// Maximum length of an evidence snippet (characters)
    pub snippet_max_len: usize,
}

impl GeneratorConfig {
    /// The per-attempt timeout as a Duration
    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.generation_timeout_secs == 0 {
            return Err("generation_timeout_secs must be greater than 0".to_string());
        }
        if self.max_evidence == 0 {
            return Err("max_evidence must be greater than 0".to_string());
        }
        if self.snippet_max_len < 20 {
            return Err("snippet_max_len must be at least 20".to_string());
        }
        Ok(())
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to a TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            generation_timeout_secs: 30,
            max_evidence: 5,
            snippet_max_len: 200,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GeneratorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = GeneratorConfig {
            generation_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tiny_snippet_rejected() {
        let config = GeneratorConfig {
            snippet_max_len: 5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = GeneratorConfig {
            generation_timeout_secs: 10,
            max_evidence: 3,
            snippet_max_len: 150,
        };

        let toml_str = config.to_toml().unwrap();
        let parsed = GeneratorConfig::from_toml(&toml_str).unwrap();
        assert_eq!(parsed.generation_timeout_secs, 10);
        assert_eq!(parsed.max_evidence, 3);
        assert_eq!(parsed.snippet_max_len, 150);
    }
}
