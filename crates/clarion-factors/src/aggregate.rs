//! Combining factor scores into one clarification verdict

use crate::registry::FactorEvaluation;
use std::collections::BTreeMap;

/// Configuration for score aggregation
///
/// Thresholds and weights are configuration; callers may tune them per
/// deployment.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Aggregate score at or above this flags the proposition
    pub global_threshold: f64,

    /// Any single factor at or above this forces a flag regardless of the
    /// aggregate
    pub override_threshold: f64,

    /// Per-factor weight overrides; factors not listed use their own weight
    pub weights: BTreeMap<String, f64>,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            global_threshold: 0.5,
            override_threshold: 0.8,
            weights: BTreeMap::new(),
        }
    }
}

/// The aggregated verdict for one evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateOutcome {
    /// Weighted combination of factor scores, clipped to [0,1]
    pub clarification_score: f64,

    /// Whether the proposition warrants clarification
    pub needs_clarification: bool,

    /// Factors whose individual score met their trigger threshold, ordered
    /// by descending score with ties broken by name
    pub triggered_factors: Vec<String>,
}

/// Combines factor scores per the configured thresholds
pub struct Aggregator {
    config: AggregatorConfig,
}

impl Aggregator {
    /// Create an aggregator with the given configuration
    pub fn new(config: AggregatorConfig) -> Self {
        Self { config }
    }

    /// Create an aggregator with default thresholds
    pub fn default_config() -> Self {
        Self::new(AggregatorConfig::default())
    }

    /// Aggregate one factor evaluation into a verdict
    ///
    /// An empty evaluation yields a neutral outcome: score 0, no
    /// clarification, no triggered factors.
    pub fn aggregate(&self, evaluation: &FactorEvaluation) -> AggregateOutcome {
        if evaluation.scores.is_empty() {
            return AggregateOutcome {
                clarification_score: 0.0,
                needs_clarification: false,
                triggered_factors: Vec::new(),
            };
        }

        let mut weighted_sum = 0.0;
        let mut weight_total = 0.0;
        let mut any_override = false;
        let mut triggered: Vec<(String, f64)> = Vec::new();

        for (name, scored) in &evaluation.scores {
            let weight = self
                .config
                .weights
                .get(name)
                .copied()
                .unwrap_or(scored.weight);

            weighted_sum += weight * scored.score;
            weight_total += weight;

            if scored.score >= scored.trigger_threshold {
                triggered.push((name.clone(), scored.score));
            }
            if scored.score >= self.config.override_threshold {
                any_override = true;
            }
        }

        let clarification_score = if weight_total > 0.0 {
            (weighted_sum / weight_total).clamp(0.0, 1.0)
        } else {
            0.0
        };

        // Stable order: descending score, ties by name
        triggered.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });

        let needs_clarification =
            clarification_score >= self.config.global_threshold || any_override;

        AggregateOutcome {
            clarification_score,
            needs_clarification,
            triggered_factors: triggered.into_iter().map(|(name, _)| name).collect(),
        }
    }
}

/// Human-readable summary of a decision, including factor omissions
pub fn decision_summary(evaluation: &FactorEvaluation, outcome: &AggregateOutcome) -> String {
    let mut summary = if evaluation.scores.is_empty() {
        "No factors evaluated; neutral result.".to_string()
    } else if outcome.triggered_factors.is_empty() {
        format!(
            "0 of {} factors triggered; aggregate score {:.2}.",
            evaluation.scores.len(),
            outcome.clarification_score
        )
    } else {
        let detail: Vec<String> = outcome
            .triggered_factors
            .iter()
            .filter_map(|name| {
                evaluation
                    .scores
                    .get(name)
                    .map(|s| format!("{}: {:.2} ({})", name, s.score, s.rationale))
            })
            .collect();
        format!(
            "{} of {} factors triggered [{}]; aggregate score {:.2}.",
            outcome.triggered_factors.len(),
            evaluation.scores.len(),
            detail.join("; "),
            outcome.clarification_score
        )
    };

    if !evaluation.omitted.is_empty() {
        let omitted: Vec<String> = evaluation
            .omitted
            .iter()
            .map(|o| format!("{} ({})", o.name, o.reason))
            .collect();
        summary.push_str(&format!(" Omitted factors: {}.", omitted.join(", ")));
    }

    summary
}
