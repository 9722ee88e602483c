//! Inputs and outputs of a single drafting attempt

use clarion_domain::{EvidenceRef, GenerationMethod, PropositionId};

/// Everything a strategy may use to draft one question
///
/// Owned and cloneable so attempts can be moved onto blocking tasks. The
/// evidence list is the complete universe a strategy may cite from.
#[derive(Debug, Clone)]
pub struct QuestionContext {
    /// The proposition version the question is for
    pub proposition_id: PropositionId,

    /// The belief statement
    pub proposition_text: String,

    /// Why the system holds the belief, when recorded
    pub proposition_reasoning: Option<String>,

    /// Name of the triggering factor
    pub factor_name: String,

    /// Stable numeric id of the triggering factor
    pub factor_id: u16,

    /// The score that triggered generation
    pub factor_score: f64,

    /// The factor's own explanation of its score
    pub factor_rationale: String,

    /// Whether a drafted question must cite evidence
    pub requires_evidence: bool,

    /// Evidence snippets available for citation
    pub evidence: Vec<EvidenceRef>,
}

/// A candidate question produced by one strategy
///
/// Drafts are unvalidated; the gatekeeper decides whether a draft becomes a
/// persisted question.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionDraft {
    /// The question text
    pub question: String,

    /// Why this question was generated
    pub reasoning: String,

    /// Evidence cited by the draft, a subset of the context's evidence
    pub evidence: Vec<EvidenceRef>,

    /// Which strategy produced the draft
    pub method: GenerationMethod,
}
