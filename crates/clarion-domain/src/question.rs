//! Clarifying questions and generation method tagging

use crate::ids::{PropositionId, QuestionId};
use crate::observation::EvidenceRef;
use std::fmt;

/// Which strategy produced a question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMethod {
    /// Deterministic per-factor template, the always-available fallback
    Template,
    /// External generation service (LLM)
    Generative,
}

impl GenerationMethod {
    /// Storage string form
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationMethod::Template => "template",
            GenerationMethod::Generative => "generative",
        }
    }

    /// Parse the storage string form
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "template" => Some(GenerationMethod::Template),
            "generative" => Some(GenerationMethod::Generative),
            _ => None,
        }
    }
}

impl fmt::Display for GenerationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A generated, validated clarifying question
///
/// Belongs to one proposition version and is attributed to exactly one
/// triggering factor. Only candidates that passed validation are persisted;
/// `validation_passed` is therefore true for every stored question.
#[derive(Debug, Clone, PartialEq)]
pub struct ClarifyingQuestion {
    /// Unique identifier
    pub id: QuestionId,

    /// The proposition version this question clarifies
    pub proposition_id: PropositionId,

    /// Name of the factor that triggered generation
    pub factor_name: String,

    /// Stable numeric id of that factor
    pub factor_id: u16,

    /// The factor score that triggered generation
    pub factor_score: f64,

    /// The question text shown to the user
    pub question: String,

    /// Why this question was generated
    pub reasoning: String,

    /// Ordered evidence citations, each traceable to an input observation
    pub evidence: Vec<EvidenceRef>,

    /// Which strategy produced the question
    pub generation_method: GenerationMethod,

    /// Whether the candidate passed validation (always true once persisted)
    pub validation_passed: bool,

    /// When the question was generated (seconds since Unix epoch)
    pub created_at: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_method_roundtrip() {
        for method in [GenerationMethod::Template, GenerationMethod::Generative] {
            assert_eq!(GenerationMethod::parse(method.as_str()), Some(method));
        }
    }

    #[test]
    fn test_generation_method_unknown() {
        assert_eq!(GenerationMethod::parse("oracle"), None);
        assert_eq!(GenerationMethod::parse(""), None);
    }
}
