//! Question validation logic

use clarion_generator::QuestionDraft;
use tracing::debug;

use crate::ValidationConfig;

/// Result of question validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether the draft passed validation
    pub status: ValidationStatus,

    /// Rejection reasons (if any)
    pub reasons: Vec<RejectionReason>,

    /// Quality score (0.0-1.0)
    pub quality_score: f64,
}

impl ValidationResult {
    /// Whether the draft was accepted
    pub fn is_accepted(&self) -> bool {
        self.status == ValidationStatus::Accepted
    }
}

/// Validation status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStatus {
    /// Draft accepted
    Accepted,

    /// Draft rejected
    Rejected,
}

/// Reasons for rejection
#[derive(Debug, Clone, PartialEq)]
pub enum RejectionReason {
    /// Question text is empty or whitespace
    EmptyQuestion,

    /// Question is not phrased interrogatively
    NotInterrogative,

    /// Question length outside the configured bounds
    LengthOutOfBounds {
        /// Actual character count
        len: usize,
        /// Minimum allowed
        min: usize,
        /// Maximum allowed
        max: usize,
    },

    /// Question leaks an internal identifier to the user
    IdentifierLeak {
        /// The offending token
        token: String,
    },

    /// Draft has no reasoning attached
    EmptyReasoning,

    /// Factor requires evidence but the draft cites none
    MissingEvidence,
}

/// Question words accepted as an interrogative opener
const QUESTION_OPENERS: &[&str] = &[
    "what", "why", "how", "when", "where", "which", "who", "do", "does", "did", "would", "could",
    "should", "can", "are", "is", "was", "were", "have", "has",
];

/// Storage-level field names that must never surface in user-facing text
const INTERNAL_FIELD_NAMES: &[&str] = &[
    "revision_group",
    "proposition_id",
    "observation_id",
    "factor_id",
    "clarification_score",
];

/// The Gatekeeper validates drafted questions before storage
pub struct Gatekeeper {
    config: ValidationConfig,
}

impl Gatekeeper {
    /// Create a new Gatekeeper with the given configuration
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Create a Gatekeeper with default configuration
    pub fn default_config() -> Self {
        Self::new(ValidationConfig::default())
    }

    /// Validate a drafted question against the configured rules
    ///
    /// `requires_evidence` reflects the triggering factor: when set, a draft
    /// that cites no observations is rejected.
    pub fn validate(&self, draft: &QuestionDraft, requires_evidence: bool) -> ValidationResult {
        let mut reasons = Vec::new();
        let mut quality_score: f64 = 1.0;

        let question = draft.question.trim();

        if question.is_empty() {
            // Nothing else is meaningful for an empty draft
            return ValidationResult {
                status: ValidationStatus::Rejected,
                reasons: vec![RejectionReason::EmptyQuestion],
                quality_score: 0.0,
            };
        }

        if self.config.validate_interrogative_form && !is_interrogative(question) {
            reasons.push(RejectionReason::NotInterrogative);
            quality_score -= 0.4;
        }

        if self.config.validate_length {
            let len = question.chars().count();
            if len < self.config.min_question_len || len > self.config.max_question_len {
                reasons.push(RejectionReason::LengthOutOfBounds {
                    len,
                    min: self.config.min_question_len,
                    max: self.config.max_question_len,
                });
                quality_score -= 0.3;
            }
        }

        if self.config.validate_identifier_leaks {
            if let Some(token) = find_identifier_leak(question) {
                reasons.push(RejectionReason::IdentifierLeak { token });
                quality_score -= 0.5;
            }
        }

        if draft.reasoning.trim().is_empty() {
            reasons.push(RejectionReason::EmptyReasoning);
            quality_score -= 0.2;
        }

        if self.config.validate_evidence_presence && requires_evidence && draft.evidence.is_empty()
        {
            reasons.push(RejectionReason::MissingEvidence);
            quality_score -= 0.3;
        }

        let status = if reasons.is_empty() {
            ValidationStatus::Accepted
        } else {
            debug!(
                question_len = question.chars().count(),
                rejection_count = reasons.len(),
                "question draft rejected"
            );
            ValidationStatus::Rejected
        };

        ValidationResult {
            status,
            reasons,
            quality_score: quality_score.max(0.0),
        }
    }
}

/// Whether text reads as a question: ends with '?' or opens with a question word
fn is_interrogative(text: &str) -> bool {
    if text.ends_with('?') {
        return true;
    }
    text.split_whitespace()
        .next()
        .map(|first| {
            let first = first.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase();
            QUESTION_OPENERS.contains(&first.as_str())
        })
        .unwrap_or(false)
}

/// Scan for a UUID-shaped token or a storage field name in user-facing text
fn find_identifier_leak(text: &str) -> Option<String> {
    let lowered = text.to_lowercase();
    for field in INTERNAL_FIELD_NAMES {
        if lowered.contains(field) {
            return Some((*field).to_string());
        }
    }

    text.split(|c: char| c.is_whitespace() || c == '"' || c == '(' || c == ')')
        .map(|t| t.trim_matches(|c: char| !c.is_ascii_hexdigit() && c != '-'))
        .find(|t| is_uuid_shaped(t))
        .map(str::to_string)
}

/// Matches the canonical 8-4-4-4-12 hex layout
fn is_uuid_shaped(token: &str) -> bool {
    let groups: Vec<&str> = token.split('-').collect();
    if groups.len() != 5 {
        return false;
    }
    let expected = [8usize, 4, 4, 4, 12];
    groups
        .iter()
        .zip(expected.iter())
        .all(|(g, &len)| g.len() == len && g.chars().all(|c| c.is_ascii_hexdigit()))
}
