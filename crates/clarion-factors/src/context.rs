//! Inputs and outputs of a single factor evaluation

use clarion_domain::{Observation, Proposition};

/// Everything a factor may look at when scoring one proposition
///
/// Borrowed views only: factors are pure and never mutate their inputs.
#[derive(Debug, Clone, Copy)]
pub struct FactorContext<'a> {
    /// The proposition version under analysis
    pub proposition: &'a Proposition,

    /// Observations backing the proposition, newest first
    pub evidence: &'a [Observation],

    /// All versions in the proposition's revision group, ascending by version
    pub history: &'a [Proposition],
}

/// A factor's verdict: normalized score plus rationale
#[derive(Debug, Clone, PartialEq)]
pub struct FactorScore {
    /// Score in [0,1]; higher means more ambiguous along this dimension
    pub score: f64,

    /// Short explanation of how the score was reached
    pub rationale: String,
}

impl FactorScore {
    /// Build a score, clamping into [0,1]
    pub fn new(score: f64, rationale: impl Into<String>) -> Self {
        Self {
            score: score.clamp(0.0, 1.0),
            rationale: rationale.into(),
        }
    }

    /// A zero score with a rationale noting why the factor did not apply
    pub fn not_applicable(rationale: impl Into<String>) -> Self {
        Self::new(0.0, rationale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factor_score_clamps() {
        assert_eq!(FactorScore::new(1.7, "over").score, 1.0);
        assert_eq!(FactorScore::new(-0.3, "under").score, 0.0);
        assert_eq!(FactorScore::new(0.42, "mid").score, 0.42);
    }

    #[test]
    fn test_not_applicable_is_zero() {
        let score = FactorScore::not_applicable("no history available");
        assert_eq!(score.score, 0.0);
        assert_eq!(score.rationale, "no history available");
    }
}
