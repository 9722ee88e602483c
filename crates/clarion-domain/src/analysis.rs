//! Clarification analysis records and their query-facing shape

use crate::ids::{PropositionId, RevisionGroupId};
use std::collections::BTreeMap;

/// The persisted ambiguity verdict for one proposition version
///
/// Exactly one analysis exists per (revision_group, version); re-running the
/// analysis replaces it. An analysis over an empty factor set is still a real
/// record (score 0, no clarification needed), never an implicit null. When a
/// proposition is revised, the prior version's analysis stays in storage as
/// history but is no longer authoritative for the revision group.
#[derive(Debug, Clone, PartialEq)]
pub struct ClarificationAnalysis {
    /// The proposition version this analysis is tied to
    pub proposition_id: PropositionId,

    /// Revision group of that proposition
    pub revision_group: RevisionGroupId,

    /// Version number within the revision group
    pub version: u32,

    /// Whether the proposition warrants a clarifying question
    pub needs_clarification: bool,

    /// Aggregated ambiguity score in [0,1]
    pub clarification_score: f64,

    /// Factors whose individual score met their trigger threshold,
    /// ordered by descending score (ties by name)
    pub triggered_factors: Vec<String>,

    /// Human-readable summary of the decision, including any factor omissions
    pub reasoning: String,

    /// Per-factor scores that fed the aggregate
    pub factor_scores: BTreeMap<String, f64>,

    /// When the analysis ran (seconds since Unix epoch)
    pub created_at: u64,
}

/// Query-facing analysis shape for a proposition
///
/// Consumers ask "what is the analysis for this proposition?" and must be
/// able to distinguish "never analyzed" from "analyzed, nothing to clarify".
/// `has_analysis = false` leaves every other field absent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalysisReport {
    /// Whether an analysis exists for the current version
    pub has_analysis: bool,

    /// Verdict, when an analysis exists
    pub needs_clarification: Option<bool>,

    /// Aggregate score, when an analysis exists
    pub clarification_score: Option<f64>,

    /// Triggered factor names, when an analysis exists
    pub triggered_factors: Option<Vec<String>>,

    /// Decision summary, when an analysis exists
    pub reasoning: Option<String>,

    /// Per-factor scores, when an analysis exists
    pub factor_scores: Option<BTreeMap<String, f64>>,

    /// Analysis timestamp, when an analysis exists
    pub created_at: Option<u64>,
}

impl AnalysisReport {
    /// The report for a proposition that has never been analyzed
    pub fn absent() -> Self {
        Self::default()
    }
}

impl From<ClarificationAnalysis> for AnalysisReport {
    fn from(a: ClarificationAnalysis) -> Self {
        Self {
            has_analysis: true,
            needs_clarification: Some(a.needs_clarification),
            clarification_score: Some(a.clarification_score),
            triggered_factors: Some(a.triggered_factors),
            reasoning: Some(a.reasoning),
            factor_scores: Some(a.factor_scores),
            created_at: Some(a.created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_report_has_no_fields() {
        let report = AnalysisReport::absent();
        assert!(!report.has_analysis);
        assert!(report.needs_clarification.is_none());
        assert!(report.clarification_score.is_none());
        assert!(report.triggered_factors.is_none());
    }

    #[test]
    fn test_report_from_analysis() {
        let mut scores = BTreeMap::new();
        scores.insert("low_observation_count".to_string(), 0.9);

        let analysis = ClarificationAnalysis {
            proposition_id: PropositionId::new(),
            revision_group: RevisionGroupId::new(),
            version: 1,
            needs_clarification: true,
            clarification_score: 0.9,
            triggered_factors: vec!["low_observation_count".to_string()],
            reasoning: "1 of 1 factors triggered".to_string(),
            factor_scores: scores,
            created_at: 1_700_000_000,
        };

        let report = AnalysisReport::from(analysis);
        assert!(report.has_analysis);
        assert_eq!(report.needs_clarification, Some(true));
        assert_eq!(report.clarification_score, Some(0.9));
        assert_eq!(
            report.triggered_factors.as_deref(),
            Some(&["low_observation_count".to_string()][..])
        );
    }
}
