//! Gatekeeper configuration

/// Configuration for question validation rules
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Enable interrogative-form checking
    pub validate_interrogative_form: bool,

    /// Enable length bounds checking
    pub validate_length: bool,

    /// Enable internal-identifier leak detection
    pub validate_identifier_leaks: bool,

    /// Enable evidence presence checking for evidence-requiring factors
    pub validate_evidence_presence: bool,

    /// Minimum question length in characters
    pub min_question_len: usize,

    /// Maximum question length in characters
    pub max_question_len: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            validate_interrogative_form: true,
            validate_length: true,
            validate_identifier_leaks: true,
            validate_evidence_presence: true,
            min_question_len: 10,
            max_question_len: 300,
        }
    }
}

impl ValidationConfig {
    /// Create a permissive configuration (minimal validation)
    pub fn permissive() -> Self {
        Self {
            validate_interrogative_form: false,
            validate_length: true,
            validate_identifier_leaks: true,
            validate_evidence_presence: false,
            min_question_len: 1,
            max_question_len: 1000,
        }
    }

    /// Create a strict configuration (all validations, tight bounds)
    pub fn strict() -> Self {
        Self {
            validate_interrogative_form: true,
            validate_length: true,
            validate_identifier_leaks: true,
            validate_evidence_presence: true,
            min_question_len: 15,
            max_question_len: 250,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.min_question_len == 0 {
            return Err("min_question_len must be greater than 0".to_string());
        }
        if self.max_question_len < self.min_question_len {
            return Err("max_question_len must not be below min_question_len".to_string());
        }
        Ok(())
    }
}
