//! Engine configuration

/// Configuration for the analysis engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Retry a rejected generative draft once with the template strategy
    pub retry_rejected_with_template: bool,

    /// Upper bound on persisted questions per analysis
    pub max_questions: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            retry_rejected_with_template: true,
            max_questions: 12,
        }
    }
}

impl EngineConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_questions == 0 {
            return Err("max_questions must be greater than 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_questions_invalid() {
        let mut config = EngineConfig::default();
        config.max_questions = 0;
        assert!(config.validate().is_err());
    }
}
