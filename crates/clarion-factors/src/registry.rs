//! Factor trait and the explicit factor registry

use crate::context::{FactorContext, FactorScore};
use crate::error::FactorError;
use crate::library;
use std::collections::BTreeMap;
use tracing::warn;

/// Default per-factor trigger threshold
pub const DEFAULT_TRIGGER_THRESHOLD: f64 = 0.6;

/// A named ambiguity heuristic
///
/// Factors are independent and order-insensitive; each scores one dimension
/// of ambiguity for a proposition. A factor that cannot compute should
/// return `FactorScore::not_applicable` rather than an error; errors are
/// reserved for genuine failures and are isolated by the registry.
pub trait Factor: Send + Sync {
    /// Stable factor name (snake_case), used as the key everywhere
    fn name(&self) -> &'static str;

    /// Stable numeric id, carried on persisted questions
    fn id(&self) -> u16;

    /// Relative weight in aggregation
    fn weight(&self) -> f64 {
        1.0
    }

    /// Individual score at or above this value marks the factor triggered
    fn trigger_threshold(&self) -> f64 {
        DEFAULT_TRIGGER_THRESHOLD
    }

    /// Whether questions for this factor must cite evidence
    fn requires_evidence(&self) -> bool {
        false
    }

    /// Score one proposition
    fn evaluate(&self, ctx: &FactorContext<'_>) -> Result<FactorScore, FactorError>;
}

/// One factor's contribution to an evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredFactor {
    /// Stable numeric id of the factor
    pub factor_id: u16,

    /// Normalized score in [0,1]
    pub score: f64,

    /// The factor's explanation
    pub rationale: String,

    /// Aggregation weight
    pub weight: f64,

    /// Trigger threshold for this factor
    pub trigger_threshold: f64,

    /// Whether questions for this factor must cite evidence
    pub requires_evidence: bool,
}

/// A factor that was excluded from aggregation because it errored
#[derive(Debug, Clone, PartialEq)]
pub struct FactorOmission {
    /// Name of the omitted factor
    pub name: String,

    /// Why it was omitted
    pub reason: String,
}

/// Full result of evaluating a registry against one proposition
#[derive(Debug, Clone, Default)]
pub struct FactorEvaluation {
    /// Per-factor scores, keyed by factor name
    pub scores: BTreeMap<String, ScoredFactor>,

    /// Factors excluded because evaluation errored
    pub omitted: Vec<FactorOmission>,
}

/// An explicitly constructed set of factors
///
/// The registry is built by the caller and passed into the engine, which
/// makes subset and custom-threshold configurations trivial in tests.
pub struct FactorRegistry {
    factors: Vec<Box<dyn Factor>>,
}

impl FactorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            factors: Vec::new(),
        }
    }

    /// Create a registry with the six built-in factors
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(library::LowObservationCount));
        registry.register(Box::new(library::ConfidenceDecay));
        registry.register(Box::new(library::HedgingLanguage));
        registry.register(Box::new(library::SiblingConflict));
        registry.register(Box::new(library::Overgeneralization));
        registry.register(Box::new(library::Opacity));
        registry
    }

    /// Add a factor to the registry
    pub fn register(&mut self, factor: Box<dyn Factor>) {
        self.factors.push(factor);
    }

    /// Number of registered factors
    pub fn len(&self) -> usize {
        self.factors.len()
    }

    /// Whether the registry has no factors
    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    /// Evaluate every registered factor against one proposition
    ///
    /// A factor returning an error is excluded from the scores and recorded
    /// in `omitted`; a single misbehaving factor never aborts the run.
    pub fn evaluate_all(&self, ctx: &FactorContext<'_>) -> FactorEvaluation {
        let mut evaluation = FactorEvaluation::default();

        for factor in &self.factors {
            match factor.evaluate(ctx) {
                Ok(score) => {
                    evaluation.scores.insert(
                        factor.name().to_string(),
                        ScoredFactor {
                            factor_id: factor.id(),
                            score: score.score.clamp(0.0, 1.0),
                            rationale: score.rationale,
                            weight: factor.weight(),
                            trigger_threshold: factor.trigger_threshold(),
                            requires_evidence: factor.requires_evidence(),
                        },
                    );
                }
                Err(e) => {
                    warn!(factor = factor.name(), error = %e, "factor evaluation failed, excluding from aggregation");
                    evaluation.omitted.push(FactorOmission {
                        name: factor.name().to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        evaluation
    }
}

impl Default for FactorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
